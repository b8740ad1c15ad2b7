//! The sections of an MSH file in the order they appear on disk.
//! Each module documents the byte layout of its section.

pub mod attachment;
pub mod attribute;
pub mod bone;
pub mod header;
pub mod mesh;

/// The size in bytes of the fixed length name slots used throughout the format.
pub const NAME_SIZE: usize = 256;
