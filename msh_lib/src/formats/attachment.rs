//! Named transform anchors stored after the attributes.
//!
//! # Layout
//! ```text
//! 0x000: name [u8; 256]
//!        translation [f32; 3], version 0.12 or later
//!        parent_bone_name [u8; 256], version 0.13 or later
//!        transform [f32; 16], version 0.13 or later
//! ```
use std::io::Write;

use crate::export::{check_fixed_string, write_fixed_string};
use crate::reader::MshReader;
use crate::version::{supports_attachment_bone_binding, supports_attachment_translation};
use crate::{DecodeError, EncodeError, FormatVersion, Matrix4x4, MshWrite, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::NAME_SIZE;

/// A named anchor like a weapon or effect attachment point, optionally bound to a bone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Clone)]
pub struct AttachmentPoint {
    pub name: String,
    /// Zero for versions without a stored translation.
    pub translation: Vector3,
    /// Always [Some] after reading a version 0.13 or later file and [None] otherwise.
    /// Writing [None] for version 0.13 or later stores an empty name.
    pub parent_bone_name: Option<String>,
    /// The identity for versions without a stored transform.
    pub transform: Matrix4x4,
}

impl AttachmentPoint {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            translation: Vector3::ZERO,
            parent_bone_name: None,
            transform: Matrix4x4::identity(),
        }
    }

    pub(crate) fn read(reader: &mut MshReader, version: FormatVersion) -> Result<Self, DecodeError> {
        let name = reader.read_fixed_string("attachment_name", NAME_SIZE)?;

        let translation = if supports_attachment_translation(version) {
            reader.read("attachment_translation")?
        } else {
            Vector3::ZERO
        };

        let (parent_bone_name, transform) = if supports_attachment_bone_binding(version) {
            let parent_bone_name =
                reader.read_fixed_string("attachment_parent_bone_name", NAME_SIZE)?;
            let transform = reader.read("attachment_transform")?;
            (Some(parent_bone_name), transform)
        } else {
            (None, Matrix4x4::identity())
        };

        Ok(Self {
            name,
            translation,
            parent_bone_name,
            transform,
        })
    }

    /// Checks that the attachment point can be written for `version`.
    /// Fields the version can't store must have their default values.
    pub fn validate(&self, version: FormatVersion) -> Result<(), EncodeError> {
        check_fixed_string("attachment_name", &self.name, NAME_SIZE)?;

        if !supports_attachment_translation(version) && self.translation != Vector3::ZERO {
            return Err(EncodeError::UnsupportedFieldForVersion {
                field: "attachment_translation",
                version,
            });
        }

        if !supports_attachment_bone_binding(version) {
            if self.parent_bone_name.is_some() {
                return Err(EncodeError::UnsupportedFieldForVersion {
                    field: "attachment_parent_bone_name",
                    version,
                });
            }
            if self.transform != Matrix4x4::identity() {
                return Err(EncodeError::UnsupportedFieldForVersion {
                    field: "attachment_transform",
                    version,
                });
            }
        }

        if let Some(parent_bone_name) = &self.parent_bone_name {
            check_fixed_string("attachment_parent_bone_name", parent_bone_name, NAME_SIZE)?;
        }
        Ok(())
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W, version: FormatVersion) -> Result<(), EncodeError> {
        self.validate(version)?;

        write_fixed_string(writer, "attachment_name", &self.name, NAME_SIZE)?;
        if supports_attachment_translation(version) {
            self.translation.msh_write(writer)?;
        }
        if supports_attachment_bone_binding(version) {
            write_fixed_string(
                writer,
                "attachment_parent_bone_name",
                self.parent_bone_name.as_deref().unwrap_or_default(),
                NAME_SIZE,
            )?;
            self.transform.msh_write(writer)?;
        }
        Ok(())
    }
}

/// The size in bytes of an attachment point record for `version`.
pub fn attachment_point_size(version: FormatVersion) -> u64 {
    let mut size = NAME_SIZE as u64;
    if supports_attachment_translation(version) {
        size += 12;
    }
    if supports_attachment_bone_binding(version) {
        size += NAME_SIZE as u64 + 64;
    }
    size
}

pub(crate) fn read_attachment_points(
    reader: &mut MshReader,
    count: usize,
    version: FormatVersion,
) -> Result<Vec<AttachmentPoint>, DecodeError> {
    reader.ensure_remaining(
        "attachment_points",
        (count as u64).saturating_mul(attachment_point_size(version)),
    )?;
    (0..count)
        .map(|_| AttachmentPoint::read(reader, version))
        .collect()
}
