use chora_scene::{ObjectKind, Scene};

use crate::camera::OrbitCamera;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and camera and produces one frame. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> Self::Output;
}

/// Renders the scene as a human-readable summary.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List every object, not just the counts.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (revision={}, populated={}) ===\n",
            scene.revision(),
            scene.is_populated()
        ));
        out.push_str(&format!(
            "Objects: {} (text={}, rings={}, cubes={})\n",
            scene.len(),
            scene.count(ObjectKind::Text),
            scene.count(ObjectKind::Ring),
            scene.count(ObjectKind::Cube)
        ));
        out.push_str(&format!(
            "Meshes: {}  Materials: {}  Matcaps: {}\n",
            scene.meshes().len(),
            scene.materials().len(),
            scene.textures().len()
        ));
        let (p, t) = (camera.position, camera.target);
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}\n",
            p.x,
            p.y,
            p.z,
            t.x,
            t.y,
            t.z,
            camera.fov_y.to_degrees(),
            camera.aspect()
        ));

        if self.verbose {
            for object in scene.objects() {
                let pos = object.transform.position;
                out.push_str(&format!(
                    "  [{}] {:?} mesh={} material={} pos=({:.2}, {:.2}, {:.2})\n",
                    object.id.short(),
                    object.kind,
                    object.mesh.0,
                    object.material.0,
                    pos.x,
                    pos.y,
                    pos.z
                ));
            }
        }

        out
    }
}
