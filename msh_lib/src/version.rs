//! Format versions and the optional fields they enable.
//!
//! The version is not stored as a number.
//! It is the last `<major>.<minor>` tag in the file's signature like "Eternity Engine Mesh File 0.13".
//! Versions compare as `(major, minor)` tuples, so 0.9 < 0.11 < 0.12.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The text preceding the version tag in signatures created by [signature_for_version].
pub const SIGNATURE_PREFIX: &str = "Eternity Engine Mesh File";

/// A `major.minor` file version resolved from the signature.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u32,
    pub minor: u32,
}

impl FormatVersion {
    pub const V0_10: FormatVersion = FormatVersion::new(0, 10);
    pub const V0_11: FormatVersion = FormatVersion::new(0, 11);
    pub const V0_12: FormatVersion = FormatVersion::new(0, 12);
    pub const V0_13: FormatVersion = FormatVersion::new(0, 13);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The text is not a `major.minor` version.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseVersionError;

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a version of the form <major>.<minor>")
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for FormatVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once('.').ok_or(ParseVersionError)?;
        let is_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(major) || !is_digits(minor) {
            return Err(ParseVersionError);
        }
        Ok(Self {
            major: major.parse().map_err(|_| ParseVersionError)?,
            minor: minor.parse().map_err(|_| ParseVersionError)?,
        })
    }
}

/// Finds the last `<digits>.<digits>` tag in `signature`.
/// Only the text before the first null character is searched.
/// Matches are found left to right without overlapping,
/// so "File 0.1.0" resolves to 0.1 rather than 1.0.
pub fn resolve_version(signature: &str) -> Option<FormatVersion> {
    let text = signature.split('\0').next().unwrap_or("");
    let bytes = text.as_bytes();

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut last = None;
    let mut i = 0;
    while i < bytes.len() {
        let major_len = digits_from(i);
        if major_len == 0 {
            i += 1;
            continue;
        }

        let dot = i + major_len;
        let minor_len = if dot < bytes.len() && bytes[dot] == b'.' {
            digits_from(dot + 1)
        } else {
            0
        };

        if minor_len > 0 {
            let end = dot + 1 + minor_len;
            // Tags with numbers too large for u32 aren't versions.
            if let Ok(version) = text[i..end].parse() {
                last = Some(version);
            }
            i = end;
        } else {
            i = dot;
        }
    }
    last
}

/// Creates the signature used by the engine's exporter for `version`.
pub fn signature_for_version(version: FormatVersion) -> String {
    format!("{SIGNATURE_PREFIX} {version}")
}

/// Attributes store a translation starting with version 0.11.
pub fn supports_attribute_translation(version: FormatVersion) -> bool {
    version >= FormatVersion::V0_11
}

/// Attributes store a transform matrix starting with version 0.12.
pub fn supports_attribute_transform(version: FormatVersion) -> bool {
    version >= FormatVersion::V0_12
}

/// Attachment points store a translation starting with version 0.12.
pub fn supports_attachment_translation(version: FormatVersion) -> bool {
    version >= FormatVersion::V0_12
}

/// Attachment points store a parent bone name and transform matrix starting with version 0.13.
pub fn supports_attachment_bone_binding(version: FormatVersion) -> bool {
    version >= FormatVersion::V0_13
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_engine_signature() {
        assert_eq!(
            Some(FormatVersion::new(0, 13)),
            resolve_version("Eternity Engine Mesh File 0.13")
        );
    }

    #[test]
    fn resolve_last_tag() {
        assert_eq!(
            Some(FormatVersion::new(0, 12)),
            resolve_version("Mesh 1.5 exported as 0.12")
        );
    }

    #[test]
    fn resolve_non_overlapping_tags() {
        assert_eq!(
            Some(FormatVersion::new(0, 1)),
            resolve_version("Eternity Engine Mesh File 0.1.0")
        );
    }

    #[test]
    fn resolve_ignores_text_after_null() {
        assert_eq!(
            Some(FormatVersion::new(0, 11)),
            resolve_version("Mesh File 0.11\0garbage 9.9")
        );
    }

    #[test]
    fn resolve_missing_tag() {
        assert_eq!(None, resolve_version("Eternity Engine Mesh File"));
        assert_eq!(None, resolve_version("version 13."));
        assert_eq!(None, resolve_version(".13"));
        assert_eq!(None, resolve_version(""));
    }

    #[test]
    fn resolve_tag_too_large() {
        assert_eq!(None, resolve_version("File 99999999999.1"));
    }

    #[test]
    fn versions_compare_as_tuples() {
        // 0.9 would be larger than 0.11 as a float.
        assert!(FormatVersion::new(0, 9) < FormatVersion::V0_11);
        assert!(FormatVersion::new(1, 0) > FormatVersion::V0_13);
    }

    #[test]
    fn parse_and_display_version() {
        let version: FormatVersion = "0.12".parse().unwrap();
        assert_eq!(FormatVersion::V0_12, version);
        assert_eq!("0.12", version.to_string());

        assert_eq!(Err(ParseVersionError), "0.".parse::<FormatVersion>());
        assert_eq!(Err(ParseVersionError), "a.1".parse::<FormatVersion>());
        assert_eq!(Err(ParseVersionError), "1".parse::<FormatVersion>());
    }

    #[test]
    fn signature_resolves_to_version() {
        let signature = signature_for_version(FormatVersion::V0_11);
        assert_eq!("Eternity Engine Mesh File 0.11", signature);
        assert_eq!(Some(FormatVersion::V0_11), resolve_version(&signature));
    }

    #[test]
    fn feature_gates() {
        let v10 = FormatVersion::V0_10;
        assert!(!supports_attribute_translation(v10));
        assert!(!supports_attribute_transform(v10));
        assert!(!supports_attachment_translation(v10));
        assert!(!supports_attachment_bone_binding(v10));

        let v11 = FormatVersion::V0_11;
        assert!(supports_attribute_translation(v11));
        assert!(!supports_attribute_transform(v11));
        assert!(!supports_attachment_translation(v11));

        let v12 = FormatVersion::V0_12;
        assert!(supports_attribute_transform(v12));
        assert!(supports_attachment_translation(v12));
        assert!(!supports_attachment_bone_binding(v12));

        assert!(supports_attachment_bone_binding(FormatVersion::V0_13));
    }
}
