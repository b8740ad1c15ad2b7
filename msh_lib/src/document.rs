use std::io::{Read, Write};
use std::path::Path;

use crate::formats::attachment::{read_attachment_points, AttachmentPoint};
use crate::formats::attribute::{read_attributes, Attribute};
use crate::formats::bone::{read_bones, Bone};
use crate::formats::header::{empty_reserved, MshHeader};
use crate::formats::mesh::{read_mesh_entries, MeshEntry};
use crate::reader::MshReader;
use crate::version::{resolve_version, signature_for_version};
use crate::{BoundingBox, DecodeError, EncodeError, FormatVersion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete MSH file.
///
/// The section counts in the header are not stored.
/// They are always calculated from the lengths of the collections when writing,
/// so adding or removing elements can't produce an inconsistent file.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Clone)]
pub struct MshDocument {
    /// The identity string at the start of the file like "Eternity Engine Mesh File 0.13".
    pub signature: String,
    /// The version resolved from [signature](#structfield.signature).
    /// Writing fails if the two disagree.
    pub format_version: FormatVersion,
    pub unknown1: i32,
    pub unknown2: i32,
    /// The bounds as stored in the file.
    /// This isn't recalculated when writing.
    pub bounding_box: BoundingBox,
    pub bones: Vec<Bone>,
    pub meshes: Vec<MeshEntry>,
    pub attributes: Vec<Attribute>,
    pub attachment_points: Vec<AttachmentPoint>,
    /// The unused region at the end of the file header.
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    pub reserved_bytes: Vec<u8>,
}

/// Settings for [decode_with_options].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Ignore any bytes after the last section instead of returning [DecodeError::TrailingData].
    pub allow_trailing_data: bool,
}

impl MshDocument {
    /// Creates an empty document with the standard signature for `version`.
    pub fn new(version: FormatVersion) -> Self {
        Self {
            signature: signature_for_version(version),
            format_version: version,
            unknown1: 0,
            unknown2: 0,
            bounding_box: BoundingBox::default(),
            bones: Vec::new(),
            meshes: Vec::new(),
            attributes: Vec::new(),
            attachment_points: Vec::new(),
            reserved_bytes: empty_reserved(),
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attachment_point_count(&self) -> usize {
        self.attachment_points.len()
    }

    /// The index of the first bone in the bone table named `name`.
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Tries to read a document from `path`.
    /// The entire file is buffered for performance.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let bytes = std::fs::read(path)?;
        decode(&bytes)
    }

    /// Tries to read a document from `reader`.
    /// All of the remaining data in `reader` is read before decoding.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode(&bytes)
    }

    /// Writes the data to `writer`.
    /// Nothing is written if the document fails validation.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let bytes = encode(self)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Writes the data to `path`.
    /// The file is only created after the document is successfully encoded.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        let bytes = encode(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Encodes the document to a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode(self)
    }

    /// Checks that the entire document can be written without writing anything.
    pub fn validate(&self) -> Result<(), EncodeError> {
        let version = resolve_version(&self.signature).ok_or(EncodeError::MissingVersionTag)?;
        if version != self.format_version {
            return Err(EncodeError::VersionMismatch {
                signature: version,
                declared: self.format_version,
            });
        }

        self.header().validate()?;
        for bone in &self.bones {
            bone.validate()?;
        }
        for mesh in &self.meshes {
            mesh.validate()?;
        }
        for attribute in &self.attributes {
            attribute.validate(self.format_version)?;
        }
        for point in &self.attachment_points {
            point.validate(self.format_version)?;
        }
        Ok(())
    }

    fn header(&self) -> MshHeader {
        MshHeader {
            signature: self.signature.clone(),
            version: self.format_version,
            mesh_count: self.mesh_count(),
            unknown1: self.unknown1,
            unknown2: self.unknown2,
            bounding_box: self.bounding_box,
            bone_count: self.bone_count(),
            attribute_count: self.attribute_count(),
            attachment_point_count: self.attachment_point_count(),
            reserved: self.reserved_bytes.clone(),
        }
    }
}

/// Reads a document from `bytes` with the default [DecodeOptions].
pub fn decode(bytes: &[u8]) -> Result<MshDocument, DecodeError> {
    decode_with_options(bytes, &DecodeOptions::default())
}

/// Reads a document from `bytes`.
/// Each section is read in file order and the first error stops reading.
pub fn decode_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<MshDocument, DecodeError> {
    let mut reader = MshReader::new(bytes);

    let header = MshHeader::read(&mut reader)?;
    let version = header.version;
    log::debug!(
        "Read header for version {} with {} meshes, {} bones, {} attributes, {} attachment points",
        version,
        header.mesh_count,
        header.bone_count,
        header.attribute_count,
        header.attachment_point_count
    );

    let bones = read_bones(&mut reader, header.bone_count)?;
    log::debug!("Read {} bones ending at offset {}", bones.len(), reader.position());

    let meshes = read_mesh_entries(&mut reader, header.mesh_count)?;
    log::debug!("Read {} meshes ending at offset {}", meshes.len(), reader.position());

    let attributes = read_attributes(&mut reader, header.attribute_count, version)?;
    log::debug!(
        "Read {} attributes ending at offset {}",
        attributes.len(),
        reader.position()
    );

    let attachment_points =
        read_attachment_points(&mut reader, header.attachment_point_count, version)?;
    log::debug!(
        "Read {} attachment points ending at offset {}",
        attachment_points.len(),
        reader.position()
    );

    let remaining = reader.remaining();
    if remaining > 0 {
        if options.allow_trailing_data {
            log::warn!(
                "Ignoring {} bytes of trailing data at offset {}",
                remaining,
                reader.position()
            );
        } else {
            return Err(DecodeError::TrailingData {
                offset: reader.position(),
                remaining,
            });
        }
    }

    Ok(MshDocument {
        signature: header.signature,
        format_version: version,
        unknown1: header.unknown1,
        unknown2: header.unknown2,
        bounding_box: header.bounding_box,
        bones,
        meshes,
        attributes,
        attachment_points,
        reserved_bytes: header.reserved,
    })
}

/// Writes `document` to a new buffer.
/// The whole document is validated first, so no bytes are produced on error.
pub fn encode(document: &MshDocument) -> Result<Vec<u8>, EncodeError> {
    document.validate()?;

    let version = document.format_version;
    let mut writer = Vec::new();

    document.header().write(&mut writer)?;
    for bone in &document.bones {
        bone.write(&mut writer)?;
    }
    log::debug!("Wrote {} bones ending at offset {}", document.bone_count(), writer.len());

    for mesh in &document.meshes {
        mesh.write(&mut writer)?;
    }
    log::debug!("Wrote {} meshes ending at offset {}", document.mesh_count(), writer.len());

    for attribute in &document.attributes {
        attribute.write(&mut writer, version)?;
    }
    for point in &document.attachment_points {
        point.write(&mut writer, version)?;
    }
    log::debug!(
        "Wrote {} attributes and {} attachment points ending at offset {}",
        document.attribute_count(),
        document.attachment_point_count(),
        writer.len()
    );

    Ok(writer)
}
