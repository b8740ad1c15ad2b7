//! Scene decorations attached to a parent object by name.
//!
//! The payload's meaning isn't known and may depend on [attribute_type](Attribute::attribute_type),
//! so it is preserved as bytes with a constant size.
//!
//! # Layout
//! ```text
//! 0x000: name [u8; 256]
//! 0x100: parent_name [u8; 256]
//! 0x200: attribute_type i32
//! 0x204: payload [u8; 212]
//!        translation [f32; 3], version 0.11 or later
//!        transform [f32; 16], version 0.12 or later
//! ```
use std::io::Write;

use crate::export::{check_fixed_string, check_region_size, write_fixed_string};
use crate::reader::MshReader;
use crate::version::{supports_attribute_transform, supports_attribute_translation};
use crate::{DecodeError, EncodeError, FormatVersion, Matrix4x4, MshWrite, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::NAME_SIZE;

/// The number of floats in the payload.
/// This is 15 + 4 + 7 floats followed by a 3x3x3 block.
pub const ATTRIBUTE_PAYLOAD_FLOATS: usize = 15 + 4 + 7 + 3 * 3 * 3;

/// The size in bytes of the payload.
pub const ATTRIBUTE_PAYLOAD_SIZE: usize = ATTRIBUTE_PAYLOAD_FLOATS * 4;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Clone)]
pub struct Attribute {
    pub name: String,
    /// The name of the mesh or object this attribute decorates.
    pub parent_name: String,
    pub attribute_type: i32,
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    pub payload: Vec<u8>,
    /// Zero for versions without a stored translation.
    pub translation: Vector3,
    /// The identity for versions without a stored transform.
    pub transform: Matrix4x4,
}

impl Attribute {
    /// Creates an attribute with a zeroed payload and default translation and transform.
    pub fn new<S: Into<String>, P: Into<String>>(name: S, parent_name: P, attribute_type: i32) -> Self {
        Self {
            name: name.into(),
            parent_name: parent_name.into(),
            attribute_type,
            payload: vec![0u8; ATTRIBUTE_PAYLOAD_SIZE],
            translation: Vector3::ZERO,
            transform: Matrix4x4::identity(),
        }
    }

    /// The payload as little endian floats.
    /// Any incomplete trailing bytes are ignored.
    pub fn payload_floats(&self) -> Vec<f32> {
        self.payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    pub(crate) fn read(reader: &mut MshReader, version: FormatVersion) -> Result<Self, DecodeError> {
        let name = reader.read_fixed_string("attribute_name", NAME_SIZE)?;
        let parent_name = reader.read_fixed_string("attribute_parent_name", NAME_SIZE)?;
        let attribute_type = reader.read("attribute_type")?;
        let payload = reader
            .read_bytes("attribute_payload", ATTRIBUTE_PAYLOAD_SIZE)?
            .to_vec();

        let translation = if supports_attribute_translation(version) {
            reader.read("attribute_translation")?
        } else {
            Vector3::ZERO
        };

        let transform = if supports_attribute_transform(version) {
            reader.read("attribute_transform")?
        } else {
            Matrix4x4::identity()
        };

        Ok(Self {
            name,
            parent_name,
            attribute_type,
            payload,
            translation,
            transform,
        })
    }

    /// Checks that the attribute can be written for `version`.
    /// Fields the version can't store must have their default values.
    pub fn validate(&self, version: FormatVersion) -> Result<(), EncodeError> {
        check_fixed_string("attribute_name", &self.name, NAME_SIZE)?;
        check_fixed_string("attribute_parent_name", &self.parent_name, NAME_SIZE)?;
        check_region_size("attribute_payload", &self.payload, ATTRIBUTE_PAYLOAD_SIZE)?;

        if !supports_attribute_translation(version) && self.translation != Vector3::ZERO {
            return Err(EncodeError::UnsupportedFieldForVersion {
                field: "attribute_translation",
                version,
            });
        }

        if !supports_attribute_transform(version) && self.transform != Matrix4x4::identity() {
            return Err(EncodeError::UnsupportedFieldForVersion {
                field: "attribute_transform",
                version,
            });
        }

        Ok(())
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W, version: FormatVersion) -> Result<(), EncodeError> {
        self.validate(version)?;

        write_fixed_string(writer, "attribute_name", &self.name, NAME_SIZE)?;
        write_fixed_string(writer, "attribute_parent_name", &self.parent_name, NAME_SIZE)?;
        self.attribute_type.msh_write(writer)?;
        writer.write_all(&self.payload)?;

        if supports_attribute_translation(version) {
            self.translation.msh_write(writer)?;
        }
        if supports_attribute_transform(version) {
            self.transform.msh_write(writer)?;
        }
        Ok(())
    }
}

/// The size in bytes of an attribute record for `version`.
pub fn attribute_size(version: FormatVersion) -> u64 {
    let mut size = (2 * NAME_SIZE + 4 + ATTRIBUTE_PAYLOAD_SIZE) as u64;
    if supports_attribute_translation(version) {
        size += 12;
    }
    if supports_attribute_transform(version) {
        size += 64;
    }
    size
}

pub(crate) fn read_attributes(
    reader: &mut MshReader,
    count: usize,
    version: FormatVersion,
) -> Result<Vec<Attribute>, DecodeError> {
    reader.ensure_remaining(
        "attributes",
        (count as u64).saturating_mul(attribute_size(version)),
    )?;
    (0..count).map(|_| Attribute::read(reader, version)).collect()
}
