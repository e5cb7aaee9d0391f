use chora_render::{OrbitCamera, Renderer};
use chora_scene::Scene;

use crate::gpu::{FrameStats, WgpuRenderer};

/// One frame's GPU target, usable wherever a [`Renderer`] is expected.
pub struct GpuFrame<'a> {
    pub renderer: &'a mut WgpuRenderer,
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target: &'a wgpu::TextureView,
}

impl Renderer for GpuFrame<'_> {
    type Output = FrameStats;

    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> FrameStats {
        self.renderer
            .render(self.device, self.queue, self.target, scene, camera)
    }
}
