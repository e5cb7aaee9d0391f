use std::collections::BTreeMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use chora_scene::{MaterialHandle, MeshHandle, Scene};

/// Per-instance model matrix, one column per attribute.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
}

impl InstanceData {
    pub fn from_matrix(model: glam::Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
        }
    }
}

/// One instanced draw: every object sharing a mesh and material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    /// Range into the instance buffer.
    pub instances: Range<u32>,
}

/// Group the scene's objects by (mesh, material) and lay their instances out
/// contiguously per group. At most `max_instances` objects are kept, in
/// scene order.
pub fn build_batches(scene: &Scene, max_instances: usize) -> (Vec<DrawBatch>, Vec<InstanceData>) {
    if scene.len() > max_instances {
        tracing::warn!(
            "scene has {} objects, drawing the first {max_instances}",
            scene.len()
        );
    }

    let mut groups: BTreeMap<(MeshHandle, MaterialHandle), Vec<InstanceData>> = BTreeMap::new();
    for object in scene.objects().iter().take(max_instances) {
        groups
            .entry((object.mesh, object.material))
            .or_default()
            .push(InstanceData::from_matrix(object.transform.matrix()));
    }

    let mut batches = Vec::with_capacity(groups.len());
    let mut instances = Vec::with_capacity(scene.len().min(max_instances));
    for ((mesh, material), group) in groups {
        let start = instances.len() as u32;
        instances.extend(group);
        batches.push(DrawBatch {
            mesh,
            material,
            instances: start..instances.len() as u32,
        });
    }
    (batches, instances)
}
