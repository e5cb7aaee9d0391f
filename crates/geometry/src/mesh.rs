use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex layout shared by every mesh: position then normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append one triangle with a flat normal derived from its winding.
    pub fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(a, normal));
        self.vertices.push(Vertex::new(b, normal));
        self.vertices.push(Vertex::new(c, normal));
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from_array(v.position) + offset).to_array();
        }
    }

    /// Move the mesh so its bounding box is centered on the origin. Returns
    /// the translation applied.
    pub fn center(&mut self) -> Vec3 {
        let Some(bounds) = self.bounding_box() else {
            return Vec3::ZERO;
        };
        let offset = -bounds.center();
        self.translate(offset);
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mut mesh = MeshData::new();
        assert!(mesh.bounding_box().is_none());
        assert_eq!(mesh.center(), Vec3::ZERO);
        assert!(mesh.is_empty());
    }

    #[test]
    fn flat_triangle_normal_follows_winding() {
        let mut mesh = MeshData::new();
        mesh.push_flat_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn center_moves_bounds_to_origin() {
        let mut mesh = MeshData::new();
        mesh.push_flat_triangle(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(5.0, 2.0, 3.0),
            Vec3::new(1.0, 8.0, 4.0),
        );
        let offset = mesh.center();
        assert_eq!(offset, Vec3::new(-3.0, -5.0, -3.5));

        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.center(), Vec3::ZERO);
        assert_eq!(bounds.size(), Vec3::new(4.0, 6.0, 1.0));
    }
}
