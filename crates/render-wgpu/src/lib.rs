//! wgpu render backend for the chora scene.
//!
//! Draws every scene object with a matcap material: shading comes entirely
//! from a lit-sphere texture indexed by the view-space normal. Objects that
//! share a mesh and material are drawn in one instanced call.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - A matcap slot without an uploaded image draws with a 1x1 neutral
//!   texture.
//! - Instances are rebuilt only when the scene revision changes.

mod batch;
mod frame;
mod gpu;
mod shaders;

pub use batch::{DrawBatch, InstanceData, build_batches};
pub use frame::GpuFrame;
pub use gpu::{FrameStats, WgpuRenderer};
