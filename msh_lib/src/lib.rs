//! # msh_lib
//!
//! msh_lib is a library for safe and efficient reading and writing of the MSH mesh format
//! identified by the "Eternity Engine Mesh File" signature.
//! The library serves two purposes.
//!
//! The first is to provide high level and unambiguous documentation for the MSH binary format.
//! Each module in [formats] documents the byte layout of one section of the file.
//! The types fully represent the binary data contained in the file including reserved and unknown regions.
//! This ensures the binary output of reading and writing a file without any modifications is identical to the original.
//!
//! The second is to make invalid files impossible to write.
//! Section counts are never stored separately from their collections,
//! and every field that a [FormatVersion] can't store is checked before any bytes are written.
//!
//! ## Versions
//! The layout of the attribute and attachment point sections depends on the version
//! tag at the end of the file's signature.
//! Fields not present in older versions are read as zero, identity, or [None] and must keep
//! those values when writing the older version.
//!
//! ## Example
//! ```rust no_run
//! use msh_lib::{MshDocument, FormatVersion};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = MshDocument::from_file("weapon.msh")?;
//! for mesh in &document.meshes {
//!     println!("{} has {} vertices", mesh.mesh_name, mesh.vertex_count());
//! }
//!
//! if document.format_version >= FormatVersion::V0_13 {
//!     for point in &document.attachment_points {
//!         println!("{} {:?}", point.name, point.parent_bone_name);
//!     }
//! }
//!
//! document.write_to_file("weapon_out.msh")?;
//! # Ok(())
//! # }
//! ```
pub mod formats;
pub mod reader;
pub mod version;

mod document;
mod error;
mod export;
mod vectors;

pub use document::{decode, decode_with_options, encode, DecodeOptions, MshDocument};
pub use error::{DecodeError, EncodeError};
pub use export::{write_fixed_string, MshWrite};
pub use formats::attachment::AttachmentPoint;
pub use formats::attribute::Attribute;
pub use formats::bone::Bone;
pub use formats::mesh::MeshEntry;
pub use reader::{FixedSize, MshReader};
pub use vectors::{BoundingBox, Matrix4x4, Vector, Vector2, Vector3, Vector4};
pub use version::FormatVersion;

#[cfg(test)]
pub(crate) fn hex_bytes(hex: &str) -> Vec<u8> {
    // Remove any whitespace used to make the tests more readable.
    let no_whitespace: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(no_whitespace).unwrap()
}
