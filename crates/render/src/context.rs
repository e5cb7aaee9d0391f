use chora_scene::Scene;

use crate::camera::{OrbitCamera, OrbitControls};
use crate::viewport::{BufferSize, Viewport, ViewportController};

/// Everything the event loop mutates: the scene, the camera and its
/// controls, and the viewport.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
    resizer: ViewportController,
}

impl AppContext {
    /// Context for a surface of `width` x `height` logical pixels.
    pub fn new(width: f32, height: f32, device_ratio: f32) -> Self {
        let mut ctx = Self {
            scene: Scene::new(),
            camera: OrbitCamera::default(),
            controls: OrbitControls::default(),
            viewport: Viewport::default(),
            resizer: ViewportController::default(),
        };
        ctx.resize(width, height, device_ratio);
        ctx
    }

    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// Handle a host resize. Returns the buffer size to configure.
    pub fn resize(&mut self, width: f32, height: f32, device_ratio: f32) -> BufferSize {
        self.resizer.apply(
            &mut self.viewport,
            &mut self.camera,
            width,
            height,
            device_ratio,
        )
    }

    pub fn buffer_size(&self) -> BufferSize {
        self.viewport.buffer_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_tracks_host_size() {
        let mut ctx = AppContext::new(800.0, 600.0, 1.0);
        assert_eq!(ctx.camera.aspect(), 800.0 / 600.0);

        let size = ctx.resize(1920.0, 1080.0, 1.0);
        assert_eq!((ctx.viewport.width, ctx.viewport.height), (1920.0, 1080.0));
        assert_eq!(ctx.camera.aspect(), 1920.0 / 1080.0);
        assert_eq!(
            size,
            BufferSize {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn resize_clamps_high_density_displays() {
        let mut ctx = AppContext::new(800.0, 600.0, 1.0);
        let size = ctx.resize(1920.0, 1080.0, 3.0);
        assert_eq!(ctx.viewport.pixel_ratio, 2.0);
        assert_eq!(size, ctx.buffer_size());
        assert_eq!(
            size,
            BufferSize {
                width: 3840,
                height: 2160
            }
        );
    }

    #[test]
    fn every_resize_applies() {
        let mut ctx = AppContext::new(800.0, 600.0, 2.0);
        for (w, h) in [(640.0, 480.0), (300.0, 900.0), (1024.0, 768.0)] {
            ctx.resize(w, h, 2.0);
            assert_eq!(ctx.camera.aspect(), w / h);
        }
        assert_eq!(ctx.viewport.width, 1024.0);
    }

    #[test]
    fn resize_leaves_camera_pose() {
        let mut ctx = AppContext::new(800.0, 600.0, 1.0);
        let position = ctx.camera.position;
        ctx.resize(1920.0, 1080.0, 1.0);
        assert_eq!(ctx.camera.position, position);
        assert!(ctx.scene.is_empty());
    }
}
