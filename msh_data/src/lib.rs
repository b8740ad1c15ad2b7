//! # msh_data
//!
//! msh_data provides a more intuitive and minimal API built on msh_lib.
//!
//! ## Features
//! The scene model is independent of the MSH layout, which makes it easier to integrate with application code than msh_lib.
//! - Usage of standard Rust types like [Vec] and [String] and [glam] types for transforms
//! - Skin weights grouped by bone instead of four fixed slots per vertex
//! - World space bone transforms instead of inverse bind matrices
//! - Errors for data the target version can't represent
/*!
```no_run
use msh_data::{from_scene, to_scene};
use msh_lib::{FormatVersion, MshDocument};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let document = MshDocument::from_file("model.msh")?;
let mut scene = to_scene(&document)?;

// Make some edits.
scene.meshes[0].name = "Body".to_string();

// Save the changes.
from_scene(&scene, FormatVersion::V0_13)?.write_to_file("model_new.msh")?;
# Ok(())
# }
```
 */
//!
//! ## File Differences
//! Converting to the scene model only keeps the data the scene model can represent.
//! Attributes, opaque header words, and reserved regions are not converted,
//! so a document created by [from_scene] uses default values for these fields.
//! Applications needing all data to be preserved should use [msh_lib](https://crates.io/crates/msh_lib).
pub mod scene_data;

pub use scene_data::{
    from_scene, to_scene, BoneInfluence, SceneBone, SceneError, SceneMarker, SceneMesh,
    SceneModel, VertexWeight,
};
