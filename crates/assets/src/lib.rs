//! Asset loading for the chora scene: typeface fonts and matcap textures.
//!
//! Asset paths are written the way a web page would reference them
//! (`/fonts/...`, `textures/...`) and resolved against an assets directory.
//! Loads can run on a background thread; completion is delivered as a
//! `Result` to a callback, never as a panic.

mod loader;
mod matcap;
mod typeface;

pub use loader::{AssetLoader, AssetTask};
pub use matcap::{ColorSpace, MatcapImage};
pub use typeface::{GlyphOutline, PathCommand, Typeface, TypefaceBounds};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid font: {0}")]
    InvalidFont(String),
    #[error("invalid outline for glyph {glyph:?}: {reason}")]
    InvalidGlyph { glyph: char, reason: String },
    #[error("failed to spawn loader task: {0}")]
    TaskSpawn(std::io::Error),
}

pub fn crate_info() -> &'static str {
    "chora-assets v0.1.0"
}
