//! Shared types used across the chora workspace.

mod types;

pub use types::{ObjectId, Transform};
