use msh_lib::formats::attachment::attachment_point_size;
use msh_lib::formats::attribute::attribute_size;
use msh_lib::formats::bone::BONE_SIZE;
use msh_lib::formats::header::HEADER_SIZE;
use msh_lib::formats::mesh::{MESH_HEADER_SIZE, VERTEX_SIZE};
use msh_lib::{
    decode, decode_with_options, encode, AttachmentPoint, Attribute, Bone, DecodeError,
    DecodeOptions, EncodeError, FormatVersion, Matrix4x4, MeshEntry, MshDocument, Vector2,
    Vector3, Vector4,
};

fn name_bytes(name: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; 256];
    bytes[..name.len()].copy_from_slice(name.as_bytes());
    bytes
}

fn push_i32(bytes: &mut Vec<u8>, value: i32) {
    bytes.extend_from_slice(&value.to_le_bytes());
}

fn push_f32s(bytes: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
}

/// A file written by hand with one triangle and no bones.
fn triangle_file() -> Vec<u8> {
    let mut bytes = name_bytes("Eternity Engine Mesh File 0.10");
    // mesh_count, unknown1, unknown2
    push_i32(&mut bytes, 1);
    push_i32(&mut bytes, 0);
    push_i32(&mut bytes, 0);
    push_f32s(&mut bytes, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    // bone_count, attribute_count, attachment_point_count
    push_i32(&mut bytes, 0);
    push_i32(&mut bytes, 0);
    push_i32(&mut bytes, 0);
    bytes.resize(HEADER_SIZE, 0);

    bytes.extend(name_bytes("Scene Root"));
    bytes.extend(name_bytes("Triangle"));
    push_i32(&mut bytes, 3);
    push_i32(&mut bytes, 3);
    push_i32(&mut bytes, 0);
    push_i32(&mut bytes, 0);
    bytes.resize(HEADER_SIZE + MESH_HEADER_SIZE, 0);

    for i in [0u16, 1, 2] {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    push_f32s(&mut bytes, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    push_f32s(&mut bytes, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    push_f32s(&mut bytes, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    bytes.extend(vec![0u8; 3 * 4]);
    bytes.extend(vec![0u8; 3 * 8]);
    push_f32s(&mut bytes, &[1.0, 0.0, 0.0, 0.0].repeat(3));
    // bone_name_count
    push_i32(&mut bytes, 0);
    bytes
}

fn skinned_mesh() -> MeshEntry {
    let mut mesh = MeshEntry::new("Scene Root", "Body");
    mesh.face_indices = vec![0, 1, 2, 2, 1, 3];
    mesh.positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
    ];
    mesh.normals = vec![Vector3::new(0.0, 0.0, 1.0); 4];
    mesh.uvs = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
        Vector2::new(1.0, 1.0),
    ];
    mesh.unknown3 = vec![0, 0, 0, 0];
    mesh.bone_indices = vec![[0, 1, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0]];
    mesh.bone_weights = vec![
        Vector4::new(0.5, 0.5, 0.0, 0.0),
        Vector4::new(1.0, 0.0, 0.0, 0.0),
        Vector4::new(1.0, 0.0, 0.0, 0.0),
        Vector4::new(1.0, 0.0, 0.0, 0.0),
    ];
    mesh.bone_names = vec!["Bip01".to_string(), "Bip01 Spine".to_string()];
    mesh
}

fn full_document(version: FormatVersion) -> MshDocument {
    let mut document = MshDocument::new(version);
    document.unknown1 = 1;
    document.unknown2 = -7;
    document.bounding_box.max = Vector3::new(1.0, 1.0, 0.0);
    document.bones.push(Bone::new("Bip01", Matrix4x4::identity()));
    document.bones.push(Bone::new("Bip01 Spine", Matrix4x4::identity()));
    document.meshes.push(skinned_mesh());
    document.attributes.push(Attribute::new("Light01", "Body", 2));

    let mut point = AttachmentPoint::new("#weapon_r");
    if version >= FormatVersion::V0_12 {
        point.translation = Vector3::new(0.5, 1.5, 0.0);
    }
    if version >= FormatVersion::V0_13 {
        point.parent_bone_name = Some("Bip01 Spine".to_string());
        point.transform.row4 = Vector4::new(0.5, 1.5, 0.0, 1.0);
    }
    document.attachment_points.push(point);
    document
}

#[test]
fn decode_encode_single_triangle() {
    let bytes = triangle_file();
    let document = decode(&bytes).unwrap();

    assert_eq!(FormatVersion::V0_10, document.format_version);
    assert_eq!(0, document.bone_count());
    assert_eq!(1, document.mesh_count());

    let mesh = &document.meshes[0];
    assert_eq!("Triangle", mesh.mesh_name);
    assert_eq!(3, mesh.vertex_count());
    assert_eq!(3, mesh.index_count());
    assert_eq!(vec![0, 1, 2], mesh.face_indices);

    assert_eq!(bytes, encode(&document).unwrap());
}

#[test]
fn decode_version_13_attachment_fields() {
    let bytes = encode(&full_document(FormatVersion::V0_13)).unwrap();
    let document = decode(&bytes).unwrap();

    assert_eq!(FormatVersion::new(0, 13), document.format_version);
    let point = &document.attachment_points[0];
    assert_eq!(Some("Bip01 Spine".to_string()), point.parent_bone_name);
    assert_eq!(Vector4::new(0.5, 1.5, 0.0, 1.0), point.transform.row4);
    assert_eq!(Some(1), document.bone_index("Bip01 Spine"));
}

#[test]
fn decode_missing_version_tag() {
    let mut bytes = triangle_file();
    bytes[..256].copy_from_slice(&name_bytes("Eternity Engine Mesh File"));
    // Corrupt counts are never reached.
    bytes[256..260].copy_from_slice(&(-1i32).to_le_bytes());

    assert!(matches!(decode(&bytes), Err(DecodeError::MissingVersionTag)));
}

#[test]
fn encode_inconsistent_normals() {
    let mut document = MshDocument::new(FormatVersion::V0_13);
    let mut mesh = MeshEntry::new("Scene Root", "Box01");
    mesh.positions = vec![Vector3::ZERO; 5];
    mesh.normals = vec![Vector3::ZERO; 4];
    mesh.uvs = vec![Vector2::ZERO; 5];
    mesh.unknown3 = vec![0; 5];
    mesh.bone_indices = vec![[0; 4]; 5];
    mesh.bone_weights = vec![Vector4::ZERO; 5];
    document.meshes.push(mesh);

    let mut writer = Vec::new();
    let result = document.write(&mut writer);
    assert!(matches!(
        result,
        Err(EncodeError::InconsistentArrayLength {
            field: "normals",
            expected: 5,
            actual: 4
        })
    ));
    assert!(writer.is_empty());
}

#[test]
fn round_trip_each_version() {
    for version in [
        FormatVersion::V0_10,
        FormatVersion::V0_11,
        FormatVersion::V0_12,
        FormatVersion::V0_13,
    ] {
        let document = full_document(version);
        let bytes = encode(&document).unwrap();

        let expected_len = HEADER_SIZE as u64
            + 2 * BONE_SIZE
            + MESH_HEADER_SIZE as u64
            + 6 * 2
            + 4 * VERTEX_SIZE
            + 4
            + 2 * 256
            + attribute_size(version)
            + attachment_point_size(version);
        assert_eq!(expected_len, bytes.len() as u64, "{version}");

        let decoded = decode(&bytes).unwrap();
        assert_eq!(document, decoded, "{version}");
        assert_eq!(bytes, encode(&decoded).unwrap(), "{version}");
    }
}

#[test]
fn decoded_counts_match_collections() {
    let bytes = encode(&full_document(FormatVersion::V0_12)).unwrap();
    let document = decode(&bytes).unwrap();

    assert_eq!(2, document.bone_count());
    assert_eq!(1, document.mesh_count());
    assert_eq!(1, document.attribute_count());
    assert_eq!(1, document.attachment_point_count());

    let mesh = &document.meshes[0];
    assert_eq!(4, mesh.vertex_count());
    assert_eq!(mesh.vertex_count(), mesh.normals.len());
    assert_eq!(mesh.vertex_count(), mesh.uvs.len());
    assert_eq!(mesh.vertex_count(), mesh.unknown3.len());
    assert_eq!(mesh.vertex_count(), mesh.bone_indices.len());
    assert_eq!(mesh.vertex_count(), mesh.bone_weights.len());
    assert_eq!(Some("Bip01 Spine"), mesh.bone_name(mesh.bone_indices[2][0]));
}

#[test]
fn version_gated_defaults() {
    let bytes = encode(&full_document(FormatVersion::V0_10)).unwrap();
    let document = decode(&bytes).unwrap();
    assert_eq!(Vector3::ZERO, document.attributes[0].translation);
    assert_eq!(Matrix4x4::identity(), document.attributes[0].transform);

    let bytes = encode(&full_document(FormatVersion::V0_11)).unwrap();
    let document = decode(&bytes).unwrap();
    let point = &document.attachment_points[0];
    assert_eq!(Vector3::ZERO, point.translation);
    assert_eq!(None, point.parent_bone_name);
    assert_eq!(Matrix4x4::identity(), point.transform);
}

#[test]
fn every_prefix_fails() {
    let bytes = encode(&full_document(FormatVersion::V0_13)).unwrap();

    for len in 0..bytes.len() {
        match decode(&bytes[..len]) {
            Err(DecodeError::UnexpectedEof { .. }) | Err(DecodeError::TruncatedMeshEntry { .. }) => (),
            other => panic!("Unexpected result for prefix of {len} bytes: {other:?}"),
        }
    }
}

#[test]
fn trailing_data() {
    let mut bytes = encode(&full_document(FormatVersion::V0_12)).unwrap();
    let len = bytes.len() as u64;
    bytes.push(0);

    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::TrailingData { offset, remaining: 1 }) if offset == len
    ));

    let options = DecodeOptions {
        allow_trailing_data: true,
    };
    let document = decode_with_options(&bytes, &options).unwrap();
    assert_eq!(full_document(FormatVersion::V0_12), document);
}

#[test]
fn count_larger_than_file() {
    let mut bytes = triangle_file();
    // Claim far more bones than the file contains.
    bytes[292..296].copy_from_slice(&i32::MAX.to_le_bytes());

    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::UnexpectedEof {
            field: "bones",
            offset: 1024
        })
    ));
}

#[test]
fn modified_document_recalculates_counts() {
    let bytes = encode(&full_document(FormatVersion::V0_13)).unwrap();
    let mut document = decode(&bytes).unwrap();
    document.attachment_points.clear();
    document.bones.pop();

    let document = decode(&encode(&document).unwrap()).unwrap();
    assert_eq!(1, document.bone_count());
    assert_eq!(0, document.attachment_point_count());
}
