//! Renderer-agnostic core of the scene viewer.
//!
//! Holds the application context (scene, orbit camera and controls,
//! viewport), the viewport controller that applies resize events, and the
//! render loop that advances damping and draws once per frame callback.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate the scene.
//! - Frames are drawn strictly one after another: `RenderLoop::tick` takes
//!   `&mut self`.
//! - A stopped loop neither draws nor reschedules.
//! - Pixel ratio never exceeds [`MAX_PIXEL_RATIO`].

mod camera;
mod context;
mod frame_loop;
mod renderer;
mod viewport;

pub use camera::{OrbitCamera, OrbitControls};
pub use context::AppContext;
pub use frame_loop::{FrameScheduler, LoopHandle, RenderLoop};
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::{BufferSize, MAX_PIXEL_RATIO, Viewport, ViewportController};

pub fn crate_info() -> &'static str {
    "chora-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
