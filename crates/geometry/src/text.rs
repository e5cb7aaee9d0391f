use chora_assets::{PathCommand, Typeface};
use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::GeometryError;
use crate::mesh::MeshData;

/// Extrusion and bevel profile for text meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Em size in world units.
    pub size: f32,
    /// Extrusion depth along +Z, not counting the bevel.
    pub depth: f32,
    /// Points generated per curved outline segment.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// How far the bevel extends in front of and behind the extrusion.
    pub bevel_thickness: f32,
    /// How far the bevel extends outward from the glyph outline.
    pub bevel_size: f32,
    /// Outline offset applied to the caps.
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.2,
            curve_segments: 12,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 5,
        }
    }
}

impl TextOptions {
    fn validate(&self) -> Result<(), GeometryError> {
        let finite = [
            self.size,
            self.depth,
            self.bevel_thickness,
            self.bevel_size,
            self.bevel_offset,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(GeometryError::InvalidOptions("non-finite text option".into()));
        }
        if self.size <= 0.0 {
            return Err(GeometryError::InvalidOptions(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if self.depth < 0.0 {
            return Err(GeometryError::InvalidOptions(format!(
                "depth must not be negative, got {}",
                self.depth
            )));
        }
        if self.curve_segments == 0 {
            return Err(GeometryError::InvalidOptions(
                "curve_segments must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Z position and outline inset of every ring from back to front.
    fn layers(&self) -> Vec<Layer> {
        if !self.bevel_enabled || self.bevel_segments == 0 {
            return vec![
                Layer { z: 0.0, inset: 0.0 },
                Layer {
                    z: self.depth,
                    inset: 0.0,
                },
            ];
        }

        let segments = self.bevel_segments;
        let ring = |b: u32| {
            let t = b as f32 / segments as f32;
            (
                self.bevel_thickness * (t * FRAC_PI_2).cos(),
                self.bevel_size * (t * FRAC_PI_2).sin() + self.bevel_offset,
            )
        };
        let full = self.bevel_size + self.bevel_offset;

        let mut layers = Vec::with_capacity(segments as usize * 2 + 2);
        for b in 0..segments {
            let (z, inset) = ring(b);
            layers.push(Layer { z: -z, inset });
        }
        layers.push(Layer { z: 0.0, inset: full });
        layers.push(Layer {
            z: self.depth,
            inset: full,
        });
        for b in (0..segments).rev() {
            let (z, inset) = ring(b);
            layers.push(Layer {
                z: self.depth + z,
                inset,
            });
        }
        layers
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Layer {
    z: f32,
    inset: f32,
}

/// A closed outline. Solids wind counter-clockwise, holes clockwise.
#[derive(Debug, Clone)]
struct Contour {
    points: Vec<Vec2>,
    /// Outward bevel direction per point, miter-scaled.
    bevel: Vec<Vec2>,
}

impl Contour {
    fn ring(&self, inset: f32) -> Vec<Vec2> {
        self.points
            .iter()
            .zip(&self.bevel)
            .map(|(p, d)| *p + *d * inset)
            .collect()
    }
}

/// Build an extruded, beveled mesh of `text`, laid out from the origin along
/// +X with the glyph baseline on y = 0. The mesh is not centered.
pub fn text_mesh(
    font: &Typeface,
    text: &str,
    options: &TextOptions,
) -> Result<MeshData, GeometryError> {
    options.validate()?;
    let _span = tracing::info_span!("text_mesh", text, size = options.size).entered();

    let layers = options.layers();
    let mut mesh = MeshData::new();

    for glyph in font.layout(text, options.size)? {
        let contours = classify(flatten(&glyph.commands, options.curve_segments));
        if contours.is_empty() {
            continue;
        }
        extrude_walls(&mut mesh, &contours, &layers);
        extrude_caps(&mut mesh, &contours, &layers)?;
    }

    tracing::debug!(
        "text mesh for {text:?}: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Turn outline commands into polylines, one per sub-path.
fn flatten(commands: &[PathCommand], segments: u32) -> Vec<Vec<Vec2>> {
    let mut polylines = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut cursor = Vec2::ZERO;

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                close_polyline(&mut polylines, std::mem::take(&mut current));
                current.push(p);
                cursor = p;
            }
            PathCommand::LineTo(p) => {
                current.push(p);
                cursor = p;
            }
            PathCommand::QuadTo { ctrl, to } => {
                let from = cursor;
                sample_curve(segments, &mut current, |t| {
                    let u = 1.0 - t;
                    from * (u * u) + ctrl * (2.0 * u * t) + to * (t * t)
                });
                cursor = to;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let from = cursor;
                sample_curve(segments, &mut current, |t| {
                    let u = 1.0 - t;
                    from * (u * u * u)
                        + ctrl1 * (3.0 * u * u * t)
                        + ctrl2 * (3.0 * u * t * t)
                        + to * (t * t * t)
                });
                cursor = to;
            }
        }
    }
    close_polyline(&mut polylines, current);
    polylines
}

/// Push `segments` points along a curve, excluding its start.
fn sample_curve(segments: u32, out: &mut Vec<Vec2>, curve: impl Fn(f32) -> Vec2) {
    out.extend((1..=segments).map(|s| curve(s as f32 / segments as f32)));
}

fn close_polyline(polylines: &mut Vec<Vec<Vec2>>, mut points: Vec<Vec2>) {
    points.dedup_by(|a, b| a.distance_squared(*b) < 1e-12);
    if points.len() > 1 && points[0].distance_squared(points[points.len() - 1]) < 1e-12 {
        points.pop();
    }
    if points.len() >= 3 && signed_area(&points).abs() > 1e-12 {
        polylines.push(points);
    }
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn contains(polygon: &[Vec2], p: Vec2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Decide holes by nesting depth and normalize winding so the right-hand
/// normal of every edge points away from the filled region.
fn classify(polylines: Vec<Vec<Vec2>>) -> Vec<Contour> {
    let holes: Vec<bool> = polylines
        .iter()
        .enumerate()
        .map(|(i, poly)| {
            let depth = polylines
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && contains(other, poly[0]))
                .count();
            depth % 2 == 1
        })
        .collect();

    polylines
        .into_iter()
        .zip(holes)
        .map(|(mut points, hole)| {
            let ccw = signed_area(&points) > 0.0;
            if ccw == hole {
                points.reverse();
            }
            let bevel = bevel_directions(&points);
            Contour { points, bevel }
        })
        .collect()
}

fn bevel_directions(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let e0 = (cur - prev).normalize_or_zero();
            let e1 = (next - cur).normalize_or_zero();
            let n0 = Vec2::new(e0.y, -e0.x);
            let n1 = Vec2::new(e1.y, -e1.x);
            let bisector = n0 + n1;
            if bisector.length_squared() < 1e-12 {
                return n0;
            }
            let dir = bisector.normalize();
            // Miter length, limited so sharp spikes stay bounded.
            dir / dir.dot(n1).max(0.5)
        })
        .collect()
}

fn extrude_walls(mesh: &mut MeshData, contours: &[Contour], layers: &[Layer]) {
    for contour in contours {
        let rings: Vec<Vec<Vec3>> = layers
            .iter()
            .map(|layer| {
                contour
                    .ring(layer.inset)
                    .into_iter()
                    .map(|p| p.extend(layer.z))
                    .collect()
            })
            .collect();

        let n = contour.points.len();
        for pair in rings.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            for i in 0..n {
                let j = (i + 1) % n;
                push_if_solid(mesh, lower[i], lower[j], upper[j]);
                push_if_solid(mesh, lower[i], upper[j], upper[i]);
            }
        }
    }
}

fn extrude_caps(
    mesh: &mut MeshData,
    contours: &[Contour],
    layers: &[Layer],
) -> Result<(), GeometryError> {
    let (Some(back), Some(front)) = (layers.first(), layers.last()) else {
        return Ok(());
    };

    let mut builder = Path::builder();
    for contour in contours {
        let ring = contour.ring(front.inset);
        builder.begin(point(ring[0].x, ring[0].y));
        for p in &ring[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(1e-4).with_fill_rule(FillRule::EvenOdd),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                Vec2::new(v.position().x, v.position().y)
            }),
        )
        .map_err(|e| GeometryError::Tessellation(format!("{e:?}")))?;

    for tri in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| buffers.vertices[tri[k] as usize]);
        let (a, b) = if (b - a).perp_dot(c - a) < 0.0 {
            (b, a)
        } else {
            (a, b)
        };
        // Counter-clockwise in the XY plane faces +Z.
        push_if_solid(mesh, a.extend(front.z), b.extend(front.z), c.extend(front.z));
        push_if_solid(mesh, b.extend(back.z), a.extend(back.z), c.extend(back.z));
    }
    Ok(())
}

fn push_if_solid(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3) {
    if (b - a).cross(c - a).length_squared() > 1e-14 {
        mesh.push_flat_triangle(a, b, c);
    }
}
