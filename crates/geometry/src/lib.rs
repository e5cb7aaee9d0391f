//! CPU-side geometry for the chora scene.
//!
//! Every builder returns a [`MeshData`] with counter-clockwise front faces
//! and per-vertex normals, ready to be copied into GPU buffers as-is.
//!
//! # Invariants
//! - Indices always refer to vertices of the same mesh.
//! - After [`MeshData::center`] the bounding box is centered on the origin.

mod mesh;
mod primitives;
mod text;

pub use mesh::{Aabb, MeshData, Vertex};
pub use primitives::{box_mesh, torus_mesh};
pub use text::{TextOptions, text_mesh};

/// Errors from geometry construction.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("tessellation failed: {0}")]
    Tessellation(String),
    #[error("invalid geometry options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Font(#[from] chora_assets::AssetError),
}
