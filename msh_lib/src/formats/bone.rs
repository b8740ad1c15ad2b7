//! The skeleton's bones stored directly after the header.
//!
//! # Layout
//! ```text
//! 0x000: name [u8; 256]
//! 0x100: transform [f32; 16], row-major
//! ```
use std::io::Write;

use crate::export::{check_fixed_string, write_fixed_string};
use crate::reader::MshReader;
use crate::{DecodeError, EncodeError, FixedSize, Matrix4x4, MshWrite};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::NAME_SIZE;

/// The size in bytes of a single bone record.
pub const BONE_SIZE: u64 = NAME_SIZE as u64 + Matrix4x4::SIZE_IN_BYTES;

/// A named bone and its transform.
/// Vertices reference bones by name, so the bone's position in the table is its identity.
/// Duplicate names are allowed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Clone)]
pub struct Bone {
    pub name: String,
    /// The transform from model space to the bone's space.
    /// This is not required to be orthonormal since some bones use non uniform scale.
    pub transform: Matrix4x4,
}

impl Bone {
    pub fn new<S: Into<String>>(name: S, transform: Matrix4x4) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }

    pub(crate) fn read(reader: &mut MshReader) -> Result<Self, DecodeError> {
        Ok(Self {
            name: reader.read_fixed_string("bone_name", NAME_SIZE)?,
            transform: reader.read("bone_transform")?,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), EncodeError> {
        check_fixed_string("bone_name", &self.name, NAME_SIZE)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        write_fixed_string(writer, "bone_name", &self.name, NAME_SIZE)?;
        self.transform.msh_write(writer)?;
        Ok(())
    }
}

/// Reads `count` bones after checking that the buffer contains all the records.
pub(crate) fn read_bones(reader: &mut MshReader, count: usize) -> Result<Vec<Bone>, DecodeError> {
    reader.ensure_remaining("bones", (count as u64).saturating_mul(BONE_SIZE))?;
    (0..count).map(|_| Bone::read(reader)).collect()
}

#[cfg(test)]
mod tests {
    use crate::hex_bytes;

    use super::*;

    fn bone_bytes(name: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; NAME_SIZE];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        bytes.extend_from_slice(&hex_bytes(
            "0000803F 00000000 00000000 00000000
             00000000 00000040 00000000 00000000
             00000000 00000000 0000803F 00000000
             0000803F 00000040 00004040 0000803F",
        ));
        bytes
    }

    #[test]
    fn bone_size() {
        assert_eq!(320, BONE_SIZE);
    }

    #[test]
    fn read_bone() {
        let bytes = bone_bytes("Bip01 Spine");
        let bone = Bone::read(&mut MshReader::new(&bytes)).unwrap();

        assert_eq!("Bip01 Spine", bone.name);
        // Non uniform scale is preserved.
        assert_eq!(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [1.0, 2.0, 3.0, 1.0],
            ],
            bone.transform.to_rows_array()
        );
    }

    #[test]
    fn read_write_bone() {
        let bytes = bone_bytes("Bip01");
        let bone = Bone::read(&mut MshReader::new(&bytes)).unwrap();

        let mut writer = Vec::new();
        bone.write(&mut writer).unwrap();
        assert_eq!(bytes, writer);
    }

    #[test]
    fn read_bones_duplicate_names() {
        let mut bytes = bone_bytes("Bip01");
        bytes.extend(bone_bytes("Bip01"));

        let bones = read_bones(&mut MshReader::new(&bytes), 2).unwrap();
        assert_eq!(2, bones.len());
        assert_eq!(bones[0], bones[1]);
    }

    #[test]
    fn read_bones_count_exceeds_buffer() {
        let bytes = bone_bytes("Bip01");
        let result = read_bones(&mut MshReader::new(&bytes), 1_000_000);
        assert!(matches!(
            result,
            Err(DecodeError::UnexpectedEof {
                field: "bones",
                offset: 0
            })
        ));
    }

    #[test]
    fn write_bone_name_too_long() {
        let bone = Bone::new("a".repeat(NAME_SIZE + 1), Matrix4x4::identity());
        assert!(matches!(
            bone.validate(),
            Err(EncodeError::FieldTooLong {
                field: "bone_name",
                len: 257,
                max: 256
            })
        ));
    }
}
