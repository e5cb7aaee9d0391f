use serde::{Deserialize, Serialize};

use crate::camera::OrbitCamera;

/// Device pixel ratios above this are rendered at this ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Drawing-surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSize {
    pub width: u32,
    pub height: u32,
}

/// Logical size of the drawing surface and the pixel ratio it renders at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Physical buffer size, never smaller than 1x1.
    pub fn buffer_size(&self) -> BufferSize {
        let scale = |v: f32| ((v * self.pixel_ratio).round() as u32).max(1);
        BufferSize {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

/// Applies host resize events to the viewport and camera.
#[derive(Debug, Clone, Copy)]
pub struct ViewportController {
    pub max_pixel_ratio: f32,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }
}

impl ViewportController {
    /// `min(device_ratio, max)`. Ratios that are not positive count as 1.
    pub fn clamp_pixel_ratio(&self, device_ratio: f32) -> f32 {
        if device_ratio > 0.0 {
            device_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }

    /// Store the new logical size, re-aim the camera projection and return
    /// the buffer size the surface must be configured to.
    pub fn apply(
        &self,
        viewport: &mut Viewport,
        camera: &mut OrbitCamera,
        width: f32,
        height: f32,
        device_ratio: f32,
    ) -> BufferSize {
        viewport.width = width;
        viewport.height = height;
        viewport.pixel_ratio = self.clamp_pixel_ratio(device_ratio);
        camera.set_aspect(viewport.aspect());

        let size = viewport.buffer_size();
        tracing::debug!(
            "viewport {width}x{height} @{} -> buffer {}x{}",
            viewport.pixel_ratio,
            size.width,
            size.height
        );
        size
    }
}
