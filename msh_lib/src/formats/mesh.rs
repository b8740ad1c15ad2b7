//! The renderable meshes stored after the bone table.
//!
//! Each entry is a fixed size header followed by arrays sized by the counts in that header.
//!
//! # Layout
//! ```text
//! 0x000: scene_name [u8; 256]
//! 0x100: mesh_name [u8; 256]
//! 0x200: vertex_count i32
//! 0x204: index_count i32
//! 0x208: unknown_a i32
//! 0x20C: bit_flags i32
//! 0x210: reserved [u8; 496]
//! 0x400: face_indices [u16; index_count]
//!        positions [[f32; 3]; vertex_count]
//!        normals [[f32; 3]; vertex_count]
//!        uvs [[f32; 2]; vertex_count]
//!        unknown3 [i32; vertex_count]
//!        bone_indices [[u16; 4]; vertex_count]
//!        bone_weights [[f32; 4]; vertex_count]
//!        bone_name_count i32
//!        bone_names [[u8; 256]; bone_name_count]
//! ```
use std::io::Write;

use crate::export::{check_fixed_string, check_region_size, count_i32, write_fixed_string};
use crate::reader::MshReader;
use crate::{DecodeError, EncodeError, FixedSize, MshWrite, Vector2, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::NAME_SIZE;

/// The size in bytes of the header at the start of each entry.
pub const MESH_HEADER_SIZE: usize = 1024;

const MESH_HEADER_FIELDS_SIZE: usize = 2 * NAME_SIZE + 4 * 4;

/// The size in bytes of the unused region padding each entry's header to [MESH_HEADER_SIZE].
pub const MESH_RESERVED_SIZE: usize = MESH_HEADER_SIZE - MESH_HEADER_FIELDS_SIZE;

/// The combined size in bytes of all the per vertex arrays for a single vertex.
pub const VERTEX_SIZE: u64 = 2 * Vector3::SIZE_IN_BYTES
    + Vector2::SIZE_IN_BYTES
    + i32::SIZE_IN_BYTES
    + <[u16; 4]>::SIZE_IN_BYTES
    + Vector4::SIZE_IN_BYTES;

/// A single mesh with its vertex data and skin weights.
///
/// The vertex count is the length of [positions](#structfield.positions).
/// Every other per vertex array must have the same length when writing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Clone)]
pub struct MeshEntry {
    pub scene_name: String,
    pub mesh_name: String,
    pub unknown_a: i32,
    pub bit_flags: i32,
    /// Vertex indices with 3 indices for each triangle.
    pub face_indices: Vec<u16>,
    pub positions: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub uvs: Vec<Vector2>,
    pub unknown3: Vec<i32>,
    /// Up to 4 indices into [bone_names](#structfield.bone_names) for each vertex.
    pub bone_indices: Vec<[u16; 4]>,
    /// The weights for each index in [bone_indices](#structfield.bone_indices).
    /// The weights usually sum to 1.0, but this isn't required.
    pub bone_weights: Vec<Vector4>,
    /// The bones used by this mesh.
    /// This is separate from the document's bone table.
    pub bone_names: Vec<String>,
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    pub reserved_bytes: Vec<u8>,
}

impl MeshEntry {
    /// Creates an entry with no vertices and a zeroed reserved region.
    pub fn new<S: Into<String>, M: Into<String>>(scene_name: S, mesh_name: M) -> Self {
        Self {
            scene_name: scene_name.into(),
            mesh_name: mesh_name.into(),
            unknown_a: 0,
            bit_flags: 0,
            face_indices: Vec::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            unknown3: Vec::new(),
            bone_indices: Vec::new(),
            bone_weights: Vec::new(),
            bone_names: Vec::new(),
            reserved_bytes: vec![0u8; MESH_RESERVED_SIZE],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.face_indices.len()
    }

    /// The name for the bone referenced by an element of [bone_indices](#structfield.bone_indices).
    pub fn bone_name(&self, bone_index: u16) -> Option<&str> {
        self.bone_names.get(bone_index as usize).map(String::as_str)
    }

    /// Checks that the entry can be written.
    /// This only checks the layout and does not check that indices are in range.
    pub fn validate(&self) -> Result<(), EncodeError> {
        check_fixed_string("scene_name", &self.scene_name, NAME_SIZE)?;
        check_fixed_string("mesh_name", &self.mesh_name, NAME_SIZE)?;
        check_region_size("mesh_reserved", &self.reserved_bytes, MESH_RESERVED_SIZE)?;

        let vertex_count = self.vertex_count();
        check_length("normals", vertex_count, self.normals.len())?;
        check_length("uvs", vertex_count, self.uvs.len())?;
        check_length("unknown3", vertex_count, self.unknown3.len())?;
        check_length("bone_indices", vertex_count, self.bone_indices.len())?;
        check_length("bone_weights", vertex_count, self.bone_weights.len())?;

        count_i32("positions", vertex_count)?;
        count_i32("face_indices", self.index_count())?;
        count_i32("bone_names", self.bone_names.len())?;

        for name in &self.bone_names {
            check_fixed_string("mesh_bone_name", name, NAME_SIZE)?;
        }
        Ok(())
    }

    pub(crate) fn read(reader: &mut MshReader, mesh_index: usize) -> Result<Self, DecodeError> {
        let scene_name = reader.read_fixed_string("scene_name", NAME_SIZE)?;
        let mesh_name = reader.read_fixed_string("mesh_name", NAME_SIZE)?;
        let vertex_count = reader.read_count("vertex_count")?;
        let index_count = reader.read_count("index_count")?;
        let unknown_a = reader.read("unknown_a")?;
        let bit_flags = reader.read("bit_flags")?;
        let reserved_bytes = reader
            .read_bytes("mesh_reserved", MESH_RESERVED_SIZE)?
            .to_vec();

        // Check the counts from this entry's header before allocating anything.
        let required = (index_count as u64 * u16::SIZE_IN_BYTES)
            .saturating_add((vertex_count as u64).saturating_mul(VERTEX_SIZE));
        ensure_entry_remaining(reader, mesh_index, required)?;

        let face_indices = reader.read_array("face_indices", index_count)?;
        let positions = reader.read_array("positions", vertex_count)?;
        let normals = reader.read_array("normals", vertex_count)?;
        let uvs = reader.read_array("uvs", vertex_count)?;
        let unknown3 = reader.read_array("unknown3", vertex_count)?;
        let bone_indices = reader.read_array("bone_indices", vertex_count)?;
        let bone_weights = reader.read_array("bone_weights", vertex_count)?;

        let bone_name_count = reader.read_count("bone_name_count")?;
        ensure_entry_remaining(
            reader,
            mesh_index,
            (bone_name_count as u64).saturating_mul(NAME_SIZE as u64),
        )?;
        let bone_names = (0..bone_name_count)
            .map(|_| reader.read_fixed_string("mesh_bone_name", NAME_SIZE))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scene_name,
            mesh_name,
            unknown_a,
            bit_flags,
            face_indices,
            positions,
            normals,
            uvs,
            unknown3,
            bone_indices,
            bone_weights,
            bone_names,
            reserved_bytes,
        })
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.validate()?;

        write_fixed_string(writer, "scene_name", &self.scene_name, NAME_SIZE)?;
        write_fixed_string(writer, "mesh_name", &self.mesh_name, NAME_SIZE)?;
        count_i32("positions", self.vertex_count())?.msh_write(writer)?;
        count_i32("face_indices", self.index_count())?.msh_write(writer)?;
        self.unknown_a.msh_write(writer)?;
        self.bit_flags.msh_write(writer)?;
        writer.write_all(&self.reserved_bytes)?;

        self.face_indices.msh_write(writer)?;
        self.positions.msh_write(writer)?;
        self.normals.msh_write(writer)?;
        self.uvs.msh_write(writer)?;
        self.unknown3.msh_write(writer)?;
        self.bone_indices.msh_write(writer)?;
        self.bone_weights.msh_write(writer)?;

        count_i32("bone_names", self.bone_names.len())?.msh_write(writer)?;
        for name in &self.bone_names {
            write_fixed_string(writer, "mesh_bone_name", name, NAME_SIZE)?;
        }
        Ok(())
    }
}

fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<(), EncodeError> {
    if expected != actual {
        Err(EncodeError::InconsistentArrayLength {
            field,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}

fn ensure_entry_remaining(
    reader: &MshReader,
    mesh_index: usize,
    required: u64,
) -> Result<(), DecodeError> {
    if required > reader.remaining() {
        Err(DecodeError::TruncatedMeshEntry {
            mesh_index,
            offset: reader.position(),
            required,
            remaining: reader.remaining(),
        })
    } else {
        Ok(())
    }
}

/// Reads `count` entries after checking that the buffer has room for each entry's header.
pub(crate) fn read_mesh_entries(
    reader: &mut MshReader,
    count: usize,
) -> Result<Vec<MeshEntry>, DecodeError> {
    reader.ensure_remaining(
        "meshes",
        (count as u64).saturating_mul(MESH_HEADER_SIZE as u64),
    )?;
    (0..count).map(|i| MeshEntry::read(reader, i)).collect()
}
