use thiserror::Error;

use crate::FormatVersion;

/// Errors while reading an MSH file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer ended before `field` could be read.
    #[error("Unexpected end of data while reading {field} at offset {offset}.")]
    UnexpectedEof { field: &'static str, offset: u64 },

    /// A fixed length string did not contain valid UTF-8.
    #[error("The string for {field} at offset {offset} is not valid UTF-8.")]
    Encoding {
        field: &'static str,
        offset: u64,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The signature does not end with a version number like "0.13".
    #[error("The file signature does not contain a version tag.")]
    MissingVersionTag,

    /// A stored element count is negative.
    #[error("The count {count} for {field} at offset {offset} is negative.")]
    InvalidCount {
        field: &'static str,
        offset: u64,
        count: i32,
    },

    /// The arrays declared by a mesh entry's header extend past the end of the buffer.
    /// `offset` is the start of the entry's arrays.
    #[error(
        "The arrays for mesh entry {mesh_index} at offset {offset} require {required} bytes but only {remaining} bytes remain."
    )]
    TruncatedMeshEntry {
        mesh_index: usize,
        offset: u64,
        required: u64,
        remaining: u64,
    },

    /// Bytes remain after the last section.
    #[error("Found {remaining} bytes of trailing data at offset {offset}.")]
    TrailingData { offset: u64, remaining: u64 },

    /// An error occurred while reading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error occurred while reading the data from the buffer.
    #[error(transparent)]
    BinRead(#[from] binrw::Error),
}

/// Errors while writing an [MshDocument](crate::MshDocument).
/// Validation happens before any bytes are written.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The UTF-8 encoding of a string does not fit in its fixed length slot.
    #[error("The value for {field} is {len} bytes but must be at most {max} bytes.")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The signature does not contain a version tag.
    #[error("The signature does not contain a version tag.")]
    MissingVersionTag,

    /// The version resolved from the signature differs from the document's format version.
    #[error("The signature declares version {signature} but the document uses version {declared}.")]
    VersionMismatch {
        signature: FormatVersion,
        declared: FormatVersion,
    },

    /// A reserved or opaque region does not have the size required by the layout.
    #[error("Expected {expected} bytes for {field} but found {actual} bytes.")]
    HeaderSizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A per vertex array does not have one element for each vertex.
    #[error("Expected {expected} elements for {field} but found {actual} elements.")]
    InconsistentArrayLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A field holds a value that the document's format version can't store.
    #[error("The field {field} is not supported by format version {version}.")]
    UnsupportedFieldForVersion {
        field: &'static str,
        version: FormatVersion,
    },

    /// A collection has more elements than a signed 32 bit count can represent.
    #[error("The {count} elements of {field} exceed the maximum count.")]
    CountOverflow { field: &'static str, count: usize },

    /// An error occurred while writing the data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
