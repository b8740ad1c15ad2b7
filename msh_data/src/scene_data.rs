//! Conversions between [MshDocument] and a format independent [SceneModel].
//!
//! Skin weights in MSH files are stored as up to four `(index, weight)` slots per vertex
//! indexing into a list of bone names local to each mesh.
//! The scene model groups the weights by bone name instead.
//! Unused slots have a weight of `0.0` and are not converted.
use glam::{Mat4, Vec3};
use msh_lib::version::{supports_attachment_bone_binding, supports_attachment_translation};
use msh_lib::{
    AttachmentPoint, Bone, BoundingBox, FormatVersion, Matrix4x4, MeshEntry, MshDocument,
    Vector2, Vector3, Vector4,
};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of bones that can influence a single vertex.
pub const MAX_INFLUENCES: usize = 4;

/// Errors while converting to or from a [SceneModel].
#[derive(Debug, Error)]
pub enum SceneError {
    /// A marker field has a non default value that the target version can't store.
    #[error("The {field} for marker {marker} is not supported by format version {version}.")]
    UnsupportedMarkerField {
        marker: String,
        field: &'static str,
        version: FormatVersion,
    },

    /// More than [MAX_INFLUENCES] bones influence a single vertex.
    #[error(
        "Vertex {vertex_index} in mesh {mesh_name} has {influence_count} influences, exceeding the limit of {}.",
        MAX_INFLUENCES
    )]
    TooManyInfluences {
        mesh_name: String,
        vertex_index: usize,
        influence_count: usize,
    },

    /// A vertex weight references a vertex that doesn't exist.
    #[error("Vertex index {vertex_index} for bone {bone_name} in mesh {mesh_name} exceeds the vertex count {vertex_count}.")]
    VertexIndexOutOfRange {
        mesh_name: String,
        bone_name: String,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// A nonzero weight uses an index past the end of the mesh's bone names.
    #[error("Bone index {bone_index} in mesh {mesh_name} exceeds the bone name count {bone_name_count}.")]
    BoneIndexOutOfRange {
        mesh_name: String,
        bone_index: u16,
        bone_name_count: usize,
    },

    /// A mesh is influenced by more bones than can be indexed.
    #[error("Mesh {mesh_name} has {bone_count} influencing bones, exceeding the limit of {}.", u16::MAX as usize + 1)]
    TooManyBones { mesh_name: String, bone_count: usize },
}

/// The meshes, skeleton, and markers of a scene.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SceneModel {
    pub meshes: Vec<SceneMesh>,
    pub bones: Vec<SceneBone>,
    pub markers: Vec<SceneMarker>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SceneMesh {
    pub scene_name: String,
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Empty or one normal for each position.
    pub normals: Vec<[f32; 3]>,
    /// Empty or one coordinate for each position.
    pub uvs: Vec<[f32; 2]>,
    pub face_indices: Vec<u16>,
    pub bone_influences: Vec<BoneInfluence>,
}

/// The vertices influenced by a single bone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub struct BoneInfluence {
    pub bone_name: String,
    pub vertex_weights: Vec<VertexWeight>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct VertexWeight {
    pub vertex_index: u32,
    pub vertex_weight: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub struct SceneBone {
    pub name: String,
    /// The bone's transform in model space.
    pub world_transform: Mat4,
}

/// A named anchor point for effects or equipment.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub struct SceneMarker {
    pub name: String,
    pub translation: Vec3,
    pub parent_bone_name: Option<String>,
    pub transform: Mat4,
}

/// Creates a document for `version` from `scene`.
///
/// The bounding box is calculated from the positions of all meshes.
/// Bone transforms are stored as the inverse of each bone's world transform.
pub fn from_scene(scene: &SceneModel, version: FormatVersion) -> Result<MshDocument, SceneError> {
    let mut document = MshDocument::new(version);

    document.bounding_box = calculate_bounding_box(&scene.meshes);

    document.bones = scene
        .bones
        .iter()
        .map(|b| Bone::new(b.name.clone(), mat4_to_matrix(&b.world_transform.inverse())))
        .collect();

    document.meshes = scene
        .meshes
        .iter()
        .map(create_mesh_entry)
        .collect::<Result<Vec<_>, _>>()?;

    document.attachment_points = scene
        .markers
        .iter()
        .map(|m| create_attachment_point(m, version))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(document)
}

/// Converts the meshes, bones, and attachment points of `document`.
pub fn to_scene(document: &MshDocument) -> Result<SceneModel, SceneError> {
    let meshes = document
        .meshes
        .iter()
        .map(create_scene_mesh)
        .collect::<Result<Vec<_>, _>>()?;

    let bones = document
        .bones
        .iter()
        .map(|b| SceneBone {
            name: b.name.clone(),
            world_transform: matrix_to_mat4(&b.transform).inverse(),
        })
        .collect();

    let markers = document
        .attachment_points
        .iter()
        .map(|p| SceneMarker {
            name: p.name.clone(),
            translation: Vec3::from(p.translation.to_array()),
            // Unbound markers are stored with an empty parent name.
            parent_bone_name: p.parent_bone_name.clone().filter(|n| !n.is_empty()),
            transform: matrix_to_mat4(&p.transform),
        })
        .collect();

    Ok(SceneModel {
        meshes,
        bones,
        markers,
    })
}

// MSH matrices are row-major with the translation in the last row.
// This matches the column layout used by glam.
fn matrix_to_mat4(m: &Matrix4x4) -> Mat4 {
    Mat4::from_cols_array_2d(&m.to_rows_array())
}

fn mat4_to_matrix(m: &Mat4) -> Matrix4x4 {
    Matrix4x4::from_rows_array(&m.to_cols_array_2d())
}

fn calculate_bounding_box(meshes: &[SceneMesh]) -> BoundingBox {
    let mut positions = meshes.iter().flat_map(|m| m.positions.iter()).map(|p| Vec3::from(*p));
    match positions.next() {
        Some(first) => {
            let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
            BoundingBox {
                min: Vector3::from(min.to_array()),
                max: Vector3::from(max.to_array()),
            }
        }
        None => BoundingBox::default(),
    }
}

fn create_mesh_entry(mesh: &SceneMesh) -> Result<MeshEntry, SceneError> {
    let vertex_count = mesh.positions.len();

    let mut entry = MeshEntry::new(mesh.scene_name.clone(), mesh.name.clone());
    entry.face_indices = mesh.face_indices.clone();
    entry.positions = mesh.positions.iter().copied().map(Vector3::from).collect();
    entry.normals = if mesh.normals.is_empty() {
        vec![Vector3::ZERO; vertex_count]
    } else {
        mesh.normals.iter().copied().map(Vector3::from).collect()
    };
    entry.uvs = if mesh.uvs.is_empty() {
        vec![Vector2::ZERO; vertex_count]
    } else {
        mesh.uvs.iter().copied().map(Vector2::from).collect()
    };
    entry.unknown3 = vec![0; vertex_count];

    let (bone_names, bone_indices, bone_weights) = pack_influences(mesh)?;
    entry.bone_names = bone_names;
    entry.bone_indices = bone_indices;
    entry.bone_weights = bone_weights;

    Ok(entry)
}

type PackedInfluences = (Vec<String>, Vec<[u16; 4]>, Vec<Vector4>);

fn pack_influences(mesh: &SceneMesh) -> Result<PackedInfluences, SceneError> {
    let vertex_count = mesh.positions.len();

    // Bones influencing the same mesh more than once share an index.
    let mut bone_names: Vec<String> = Vec::new();
    let mut slots: Vec<Vec<(u16, f32)>> = vec![Vec::new(); vertex_count];

    for influence in &mesh.bone_influences {
        let bone_index = match bone_names.iter().position(|n| n == &influence.bone_name) {
            Some(i) => i,
            None => {
                bone_names.push(influence.bone_name.clone());
                bone_names.len() - 1
            }
        };
        let bone_index = u16::try_from(bone_index).map_err(|_| SceneError::TooManyBones {
            mesh_name: mesh.name.clone(),
            bone_count: bone_names.len(),
        })?;

        for weight in &influence.vertex_weights {
            let vertex_slots = slots.get_mut(weight.vertex_index as usize).ok_or_else(|| {
                SceneError::VertexIndexOutOfRange {
                    mesh_name: mesh.name.clone(),
                    bone_name: influence.bone_name.clone(),
                    vertex_index: weight.vertex_index,
                    vertex_count,
                }
            })?;
            vertex_slots.push((bone_index, weight.vertex_weight));
        }
    }

    let mut bone_indices = Vec::with_capacity(vertex_count);
    let mut bone_weights = Vec::with_capacity(vertex_count);
    for (vertex_index, vertex_slots) in slots.iter().enumerate() {
        if vertex_slots.len() > MAX_INFLUENCES {
            return Err(SceneError::TooManyInfluences {
                mesh_name: mesh.name.clone(),
                vertex_index,
                influence_count: vertex_slots.len(),
            });
        }

        let mut indices = [0u16; 4];
        let mut weights = [0f32; 4];
        for (i, (bone_index, weight)) in vertex_slots.iter().enumerate() {
            indices[i] = *bone_index;
            weights[i] = *weight;
        }
        bone_indices.push(indices);
        bone_weights.push(Vector4::from(weights));
    }

    Ok((bone_names, bone_indices, bone_weights))
}

fn create_scene_mesh(entry: &MeshEntry) -> Result<SceneMesh, SceneError> {
    let mut bone_influences: Vec<BoneInfluence> = entry
        .bone_names
        .iter()
        .map(|name| BoneInfluence {
            bone_name: name.clone(),
            vertex_weights: Vec::new(),
        })
        .collect();

    for (vertex_index, (indices, weights)) in entry
        .bone_indices
        .iter()
        .zip(entry.bone_weights.iter())
        .enumerate()
    {
        for (bone_index, weight) in indices.iter().zip(weights.to_array()) {
            if weight == 0.0 {
                continue;
            }

            let influence = bone_influences
                .get_mut(*bone_index as usize)
                .ok_or_else(|| SceneError::BoneIndexOutOfRange {
                    mesh_name: entry.mesh_name.clone(),
                    bone_index: *bone_index,
                    bone_name_count: entry.bone_names.len(),
                })?;
            influence.vertex_weights.push(VertexWeight {
                vertex_index: vertex_index as u32,
                vertex_weight: weight,
            });
        }
    }

    Ok(SceneMesh {
        scene_name: entry.scene_name.clone(),
        name: entry.mesh_name.clone(),
        positions: entry.positions.iter().map(|v| v.to_array()).collect(),
        normals: entry.normals.iter().map(|v| v.to_array()).collect(),
        uvs: entry.uvs.iter().map(|v| v.to_array()).collect(),
        face_indices: entry.face_indices.clone(),
        bone_influences,
    })
}

fn create_attachment_point(
    marker: &SceneMarker,
    version: FormatVersion,
) -> Result<AttachmentPoint, SceneError> {
    let unsupported = |field| SceneError::UnsupportedMarkerField {
        marker: marker.name.clone(),
        field,
        version,
    };

    if !supports_attachment_translation(version) && marker.translation != Vec3::ZERO {
        return Err(unsupported("translation"));
    }
    if !supports_attachment_bone_binding(version) {
        if marker.parent_bone_name.is_some() {
            return Err(unsupported("parent_bone_name"));
        }
        if marker.transform != Mat4::IDENTITY {
            return Err(unsupported("transform"));
        }
    }

    let mut point = AttachmentPoint::new(marker.name.clone());
    point.translation = Vector3::from(marker.translation.to_array());
    point.parent_bone_name = marker.parent_bone_name.clone();
    point.transform = mat4_to_matrix(&marker.transform);
    Ok(point)
}
