//! Scene container and populator.
//!
//! # Invariants
//! - The scene only grows: objects are inserted, never removed or reordered.
//! - Every object references a mesh and material registered in the same scene.
//! - Population runs at most once per scene.
//! - With the same entropy source, population produces identical placements.

mod populate;
mod scene;

pub use populate::{
    PopulateConfig, PopulateSummary, Placement, TorusProfile, insert_text, place_objects,
    populate, scatter_solids,
};
pub use scene::{
    Material, MaterialHandle, MeshHandle, ObjectKind, Scene, SceneObject, TextureHandle,
    TextureSlot,
};

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene has already been populated")]
    AlreadyPopulated,
    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("unknown material handle {0:?}")]
    UnknownMaterial(MaterialHandle),
    #[error("unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),
    #[error("invalid populate config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Geometry(#[from] chora_geometry::GeometryError),
}
