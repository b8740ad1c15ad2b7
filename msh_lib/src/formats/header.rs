//! The fixed size header at the start of every MSH file.
//!
//! # Layout
//! ```text
//! 0x000: signature [u8; 256], "Eternity Engine Mesh File 0.13"
//! 0x100: mesh_count i32
//! 0x104: unknown1 i32
//! 0x108: unknown2 i32
//! 0x10C: bounding_box min [f32; 3], max [f32; 3]
//! 0x124: bone_count i32
//! 0x128: attribute_count i32
//! 0x12C: attachment_point_count i32
//! 0x130: reserved [u8; 720]
//! ```
use std::io::Write;

use crate::export::{check_fixed_string, check_region_size, count_i32, write_fixed_string};
use crate::reader::MshReader;
use crate::version::resolve_version;
use crate::{BoundingBox, DecodeError, EncodeError, FixedSize, FormatVersion, MshWrite};

use super::NAME_SIZE;

/// The size in bytes of the header.
pub const HEADER_SIZE: usize = 1024;

/// The size in bytes of the signature slot.
pub const SIGNATURE_SIZE: usize = NAME_SIZE;

const HEADER_FIELDS_SIZE: usize = SIGNATURE_SIZE + 3 * 4 + BoundingBox::SIZE_IN_BYTES as usize + 3 * 4;

/// The size in bytes of the unused region padding the header to [HEADER_SIZE].
pub const HEADER_RESERVED_SIZE: usize = HEADER_SIZE - HEADER_FIELDS_SIZE;

/// The decoded header with the counts for each of the following sections.
/// The counts are only used for reading.
/// Writing a document always uses the lengths of its collections instead.
#[derive(Debug, PartialEq, Clone)]
pub struct MshHeader {
    pub signature: String,
    /// The version resolved from [signature](#structfield.signature).
    pub version: FormatVersion,
    pub mesh_count: usize,
    pub unknown1: i32,
    pub unknown2: i32,
    pub bounding_box: BoundingBox,
    pub bone_count: usize,
    pub attribute_count: usize,
    pub attachment_point_count: usize,
    pub reserved: Vec<u8>,
}

impl MshHeader {
    /// Reads the header starting at the reader's current position.
    /// The version is resolved immediately after the signature,
    /// so files without a version tag fail before any counts are read.
    pub fn read(reader: &mut MshReader) -> Result<Self, DecodeError> {
        let signature = reader.read_fixed_string("signature", SIGNATURE_SIZE)?;
        let version = resolve_version(&signature).ok_or(DecodeError::MissingVersionTag)?;

        let mesh_count = reader.read_count("mesh_count")?;
        let unknown1 = reader.read("unknown1")?;
        let unknown2 = reader.read("unknown2")?;
        let bounding_box = reader.read("bounding_box")?;
        let bone_count = reader.read_count("bone_count")?;
        let attribute_count = reader.read_count("attribute_count")?;
        let attachment_point_count = reader.read_count("attachment_point_count")?;
        let reserved = reader
            .read_bytes("header_reserved", HEADER_RESERVED_SIZE)?
            .to_vec();

        Ok(Self {
            signature,
            version,
            mesh_count,
            unknown1,
            unknown2,
            bounding_box,
            bone_count,
            attribute_count,
            attachment_point_count,
            reserved,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), EncodeError> {
        check_fixed_string("signature", &self.signature, SIGNATURE_SIZE)?;
        check_region_size("header_reserved", &self.reserved, HEADER_RESERVED_SIZE)?;
        count_i32("meshes", self.mesh_count)?;
        count_i32("bones", self.bone_count)?;
        count_i32("attributes", self.attribute_count)?;
        count_i32("attachment_points", self.attachment_point_count)?;
        Ok(())
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.validate()?;

        write_fixed_string(writer, "signature", &self.signature, SIGNATURE_SIZE)?;
        count_i32("meshes", self.mesh_count)?.msh_write(writer)?;
        self.unknown1.msh_write(writer)?;
        self.unknown2.msh_write(writer)?;
        self.bounding_box.msh_write(writer)?;
        count_i32("bones", self.bone_count)?.msh_write(writer)?;
        count_i32("attributes", self.attribute_count)?.msh_write(writer)?;
        count_i32("attachment_points", self.attachment_point_count)?.msh_write(writer)?;
        writer.write_all(&self.reserved)?;
        Ok(())
    }
}

/// Creates a zeroed reserved region for new headers.
pub(crate) fn empty_reserved() -> Vec<u8> {
    vec![0u8; HEADER_RESERVED_SIZE]
}
