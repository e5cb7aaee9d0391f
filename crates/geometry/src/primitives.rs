use glam::Vec3;
use std::f32::consts::TAU;

use crate::mesh::{MeshData, Vertex};

/// Axis-aligned box centered on the origin, one quad per face.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let v = |px: f32, py: f32, pz: f32, n: [f32; 3]| Vertex {
        position: [px, py, pz],
        normal: n,
    };
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        v(-x, -y,  z, [0.0, 0.0, 1.0]),
        v( x, -y,  z, [0.0, 0.0, 1.0]),
        v( x,  y,  z, [0.0, 0.0, 1.0]),
        v(-x,  y,  z, [0.0, 0.0, 1.0]),
        // -Z face
        v( x, -y, -z, [0.0, 0.0, -1.0]),
        v(-x, -y, -z, [0.0, 0.0, -1.0]),
        v(-x,  y, -z, [0.0, 0.0, -1.0]),
        v( x,  y, -z, [0.0, 0.0, -1.0]),
        // +X face
        v( x, -y,  z, [1.0, 0.0, 0.0]),
        v( x, -y, -z, [1.0, 0.0, 0.0]),
        v( x,  y, -z, [1.0, 0.0, 0.0]),
        v( x,  y,  z, [1.0, 0.0, 0.0]),
        // -X face
        v(-x, -y, -z, [-1.0, 0.0, 0.0]),
        v(-x, -y,  z, [-1.0, 0.0, 0.0]),
        v(-x,  y,  z, [-1.0, 0.0, 0.0]),
        v(-x,  y, -z, [-1.0, 0.0, 0.0]),
        // +Y face
        v(-x,  y,  z, [0.0, 1.0, 0.0]),
        v( x,  y,  z, [0.0, 1.0, 0.0]),
        v( x,  y, -z, [0.0, 1.0, 0.0]),
        v(-x,  y, -z, [0.0, 1.0, 0.0]),
        // -Y face
        v(-x, -y, -z, [0.0, -1.0, 0.0]),
        v( x, -y, -z, [0.0, -1.0, 0.0]),
        v( x, -y,  z, [0.0, -1.0, 0.0]),
        v(-x, -y,  z, [0.0, -1.0, 0.0]),
    ];
    let indices = (0..6u32)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();
    MeshData { vertices, indices }
}

/// Torus around the Z axis.
///
/// `radius` is the distance from the center to the middle of the tube;
/// `radial_segments` divide the tube cross-section and `tubular_segments`
/// divide the ring. The seam vertices are duplicated.
pub fn torus_mesh(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> MeshData {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let row = tubular + 1;

    let mut mesh = MeshData {
        vertices: Vec::with_capacity(((radial + 1) * row) as usize),
        indices: Vec::with_capacity((radial * tubular * 6) as usize),
    };

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.vertices
                .push(Vertex::new(position, (position - center).normalize_or_zero()));
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData, center_of: impl Fn(Vec3) -> Vec3) {
        for tri in mesh.indices.chunks(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .collect();
            let face_normal = (p[1] - p[0]).cross(p[2] - p[0]);
            if face_normal.length_squared() < 1e-12 {
                continue;
            }
            let centroid = (p[0] + p[1] + p[2]) / 3.0;
            let outward = centroid - center_of(centroid);
            assert!(
                face_normal.dot(outward) > 0.0,
                "triangle {tri:?} faces inward"
            );
        }
    }

    #[test]
    fn unit_box_layout() {
        let mesh = box_mesh(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-0.5));
        assert_eq!(bounds.max, Vec3::splat(0.5));
        assert_outward(&mesh, |_| Vec3::ZERO);
    }

    #[test]
    fn box_respects_dimensions() {
        let bounds = box_mesh(2.0, 4.0, 6.0).bounding_box().unwrap();
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn torus_counts_and_extent() {
        let mesh = torus_mesh(0.3, 0.2, 32, 64);
        assert_eq!(mesh.vertex_count(), 33 * 65);
        assert_eq!(mesh.triangle_count(), 32 * 64 * 2);

        let bounds = mesh.bounding_box().unwrap();
        assert!((bounds.max.x - 0.5).abs() < 1e-5);
        assert!((bounds.max.z - 0.2).abs() < 1e-5);
        assert!((bounds.min.z + 0.2).abs() < 1e-5);
    }

    #[test]
    fn torus_normals_point_away_from_tube_center() {
        let mesh = torus_mesh(0.3, 0.2, 8, 16);
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        assert_outward(&mesh, |p| Vec3::new(p.x, p.y, 0.0).normalize_or_zero() * 0.3);
    }
}
