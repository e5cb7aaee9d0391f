use chora_assets::Typeface;
use chora_common::{ObjectId, Transform};
use chora_geometry::{TextOptions, box_mesh, text_mesh, torus_mesh};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::SceneError;
use crate::scene::{MaterialHandle, ObjectKind, Scene};

/// Cross-section and tessellation of the ring solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorusProfile {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
}

impl Default for TorusProfile {
    fn default() -> Self {
        Self {
            radius: 0.3,
            tube: 0.2,
            radial_segments: 32,
            tubular_segments: 64,
        }
    }
}

/// Everything the populator needs besides the font, materials and entropy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulateConfig {
    pub text: String,
    pub text_options: TextOptions,
    /// Number of placed solids; even indices are rings, odd are cubes.
    pub object_count: usize,
    pub torus: TorusProfile,
    pub cube_size: f32,
    /// Smallest distance from the origin along any axis.
    pub min_distance: f32,
    /// Width of the band beyond `min_distance` a coordinate may fall in.
    pub spread: f32,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            text: "Chora Club".into(),
            text_options: TextOptions::default(),
            object_count: 300,
            torus: TorusProfile::default(),
            cube_size: 1.0,
            min_distance: 0.5,
            spread: 9.5,
        }
    }
}

impl PopulateConfig {
    /// Reject settings that would put solids on an axis plane or turn
    /// their meshes inside out.
    pub fn validate(&self) -> Result<(), SceneError> {
        let t = self.torus;
        let finite = [
            self.cube_size,
            self.min_distance,
            self.spread,
            t.radius,
            t.tube,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(SceneError::InvalidConfig("non-finite populate setting".into()));
        }
        if self.min_distance <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "min_distance must be positive, got {}",
                self.min_distance
            )));
        }
        if self.spread < 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "spread must not be negative, got {}",
                self.spread
            )));
        }
        if self.cube_size <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "cube_size must be positive, got {}",
                self.cube_size
            )));
        }
        if t.radius <= 0.0 || t.tube <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "torus radius and tube must be positive, got {} and {}",
                t.radius, t.tube
            )));
        }
        Ok(())
    }
}

/// Randomized parameters of one placed solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub kind: ObjectKind,
    pub position: Vec3,
    /// XYZ Euler angles in radians. Z is always zero.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Placement {
    pub fn transform(&self) -> Transform {
        Transform::from_euler_uniform(self.position, self.rotation, self.scale)
    }
}

/// What a population run inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateSummary {
    pub text: ObjectId,
    pub text_triangles: usize,
    pub solids: usize,
}

/// Draw `config.object_count` placements.
///
/// Per object the draws are, in order: sign and magnitude for x, y and z,
/// rotation about x, rotation about y, then scale.
pub fn place_objects<R: Rng + ?Sized>(config: &PopulateConfig, rng: &mut R) -> Vec<Placement> {
    let axis = |rng: &mut R| {
        let sign = if rng.r#gen::<f32>() < 0.5 { -1.0 } else { 1.0 };
        sign * (rng.r#gen::<f32>() * config.spread + config.min_distance)
    };

    (0..config.object_count)
        .map(|index| {
            let kind = if index % 2 == 0 {
                ObjectKind::Ring
            } else {
                ObjectKind::Cube
            };
            let position = Vec3::new(axis(rng), axis(rng), axis(rng));
            let rotation = Vec3::new(rng.r#gen::<f32>() * PI, rng.r#gen::<f32>() * PI, 0.0);
            let scale = rng.r#gen::<f32>();
            Placement {
                index,
                kind,
                position,
                rotation,
                scale,
            }
        })
        .collect()
}

/// Build the text mesh, center it on its bounds and insert it.
pub fn insert_text(
    scene: &mut Scene,
    font: &Typeface,
    material: MaterialHandle,
    config: &PopulateConfig,
) -> Result<ObjectId, SceneError> {
    if scene.material(material).is_none() {
        return Err(SceneError::UnknownMaterial(material));
    }
    let mut mesh = text_mesh(font, &config.text, &config.text_options)?;
    mesh.center();
    let mesh = scene.add_mesh(mesh);
    scene.insert(ObjectKind::Text, mesh, material, Transform::default())
}

/// Register the shared ring and cube meshes and insert every placement.
pub fn scatter_solids<R: Rng + ?Sized>(
    scene: &mut Scene,
    material: MaterialHandle,
    config: &PopulateConfig,
    rng: &mut R,
) -> Result<Vec<ObjectId>, SceneError> {
    if scene.material(material).is_none() {
        return Err(SceneError::UnknownMaterial(material));
    }
    let t = config.torus;
    let ring = scene.add_mesh(torus_mesh(
        t.radius,
        t.tube,
        t.radial_segments,
        t.tubular_segments,
    ));
    let cube = scene.add_mesh(box_mesh(config.cube_size, config.cube_size, config.cube_size));

    place_objects(config, rng)
        .into_iter()
        .map(|p| {
            let mesh = match p.kind {
                ObjectKind::Ring => ring,
                _ => cube,
            };
            scene.insert(p.kind, mesh, material, p.transform())
        })
        .collect()
}

/// Fill an empty scene with the centered text and the scattered solids.
///
/// Runs once per scene. The config and both materials are checked before
/// anything is inserted.
pub fn populate<R: Rng + ?Sized>(
    scene: &mut Scene,
    font: &Typeface,
    text_material: MaterialHandle,
    fill_material: MaterialHandle,
    config: &PopulateConfig,
    rng: &mut R,
) -> Result<PopulateSummary, SceneError> {
    if scene.is_populated() {
        return Err(SceneError::AlreadyPopulated);
    }
    config.validate()?;
    for material in [text_material, fill_material] {
        if scene.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
    }

    let _span = tracing::info_span!("populate", objects = config.object_count).entered();

    let text = insert_text(scene, font, text_material, config)?;
    let text_triangles = scene
        .objects()
        .last()
        .and_then(|o| scene.mesh(o.mesh))
        .map_or(0, |m| m.triangle_count());
    let solids = scatter_solids(scene, fill_material, config, rng)?.len();
    scene.mark_populated();

    tracing::info!(
        "scene populated: text {:?} ({text_triangles} triangles), {solids} solids",
        config.text
    );

    Ok(PopulateSummary {
        text,
        text_triangles,
        solids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const FONT: &str = r#"{
        "familyName": "Blocks",
        "resolution": 1000,
        "underlineThickness": 50,
        "boundingBox": { "xMin": 0, "xMax": 1000, "yMin": -200, "yMax": 950 },
        "glyphs": {
            "C": { "ha": 700, "o": "m 600 0 l 600 150 l 150 150 l 150 550 l 600 550 l 600 700 l 0 700 l 0 0 z" },
            "l": { "ha": 300, "o": "m 0 0 l 200 0 l 200 750 l 0 750 z" },
            " ": { "ha": 250 },
            "?": { "ha": 600, "o": "m 0 0 l 500 0 l 500 500 l 0 500 z" }
        }
    }"#;

    fn setup() -> (Scene, Typeface, MaterialHandle, MaterialHandle) {
        let mut scene = Scene::new();
        let text_tex = scene.add_texture("textures/matcaps/9.jpg");
        let fill_tex = scene.add_texture("textures/matcaps/11.jpg");
        let text = scene.add_material("text", text_tex).unwrap();
        let fill = scene.add_material("fill", fill_tex).unwrap();
        (scene, Typeface::from_json(FONT).unwrap(), text, fill)
    }

    #[test]
    fn defaults_match_scene_layout() {
        let config = PopulateConfig::default();
        assert_eq!(config.text, "Chora Club");
        assert_eq!(config.object_count, 300);
        assert_eq!(config.torus, TorusProfile::default());
        assert_eq!(config.cube_size, 1.0);
        assert_eq!((config.min_distance, config.spread), (0.5, 9.5));
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let config: PopulateConfig =
            serde_json::from_str(r#"{ "text": "Hi", "object_count": 10 }"#).unwrap();
        assert_eq!(config.text, "Hi");
        assert_eq!(config.object_count, 10);
        assert_eq!(config.text_options, TextOptions::default());
    }

    #[test]
    fn shapes_alternate_by_parity() {
        let mut rng = StdRng::seed_from_u64(1);
        let placements = place_objects(&PopulateConfig::default(), &mut rng);
        assert_eq!(placements.len(), 300);
        for p in &placements {
            let expected = if p.index % 2 == 0 {
                ObjectKind::Ring
            } else {
                ObjectKind::Cube
            };
            assert_eq!(p.kind, expected);
        }
    }

    #[test]
    fn placements_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let placements = place_objects(&PopulateConfig::default(), &mut rng);
        for p in &placements {
            for c in p.position.to_array() {
                assert!((0.5..=10.0).contains(&c.abs()), "coordinate {c} out of range");
            }
            assert!((0.0..1.0).contains(&p.scale));
            assert!((0.0..PI).contains(&p.rotation.x));
            assert!((0.0..PI).contains(&p.rotation.y));
            assert_eq!(p.rotation.z, 0.0);
        }
    }

    #[test]
    fn both_signs_occur_on_every_axis() {
        let mut rng = StdRng::seed_from_u64(3);
        let placements = place_objects(&PopulateConfig::default(), &mut rng);
        for axis in 0..3 {
            assert!(placements.iter().any(|p| p.position[axis] < 0.0));
            assert!(placements.iter().any(|p| p.position[axis] > 0.0));
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let config = PopulateConfig::default();
        let a = place_objects(&config, &mut StdRng::seed_from_u64(42));
        let b = place_objects(&config, &mut StdRng::seed_from_u64(42));
        let c = place_objects(&config, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn placement_transform_uses_uniform_scale() {
        let mut rng = StdRng::seed_from_u64(9);
        let p = place_objects(&PopulateConfig::default(), &mut rng)[0];
        let t = p.transform();
        assert_eq!(t.position, p.position);
        assert_eq!(t.scale, Vec3::splat(p.scale));
    }

    #[test]
    fn populate_fills_scene() {
        let (mut scene, font, text, fill) = setup();
        let mut rng = StdRng::seed_from_u64(5);
        let summary = populate(
            &mut scene,
            &font,
            text,
            fill,
            &PopulateConfig::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(summary.solids, 300);
        assert!(summary.text_triangles > 0);
        assert_eq!(scene.len(), 301);
        assert!(scene.is_populated());

        let first = &scene.objects()[0];
        assert_eq!(first.id, summary.text);
        assert_eq!(first.kind, ObjectKind::Text);
        assert_eq!(first.material, text);
        assert_eq!(first.transform, Transform::default());

        let solids = &scene.objects()[1..];
        assert!(solids.iter().all(|o| o.material == fill));
        assert_eq!(scene.count(ObjectKind::Ring), 150);
        assert_eq!(scene.count(ObjectKind::Cube), 150);
        assert_eq!(solids[0].kind, ObjectKind::Ring);
        assert_eq!(solids[1].kind, ObjectKind::Cube);
        // One text mesh plus the two shared solid meshes.
        assert_eq!(scene.meshes().len(), 3);
    }

    #[test]
    fn text_is_centered_on_origin() {
        let (mut scene, font, text, _) = setup();
        for s in ["C", "Chora Club", "Cl Cl Cl Cl Cl Cl"] {
            let config = PopulateConfig {
                text: s.into(),
                ..PopulateConfig::default()
            };
            let id = insert_text(&mut scene, &font, text, &config).unwrap();
            let object = scene.objects().iter().find(|o| o.id == id).unwrap();
            let bounds = scene.mesh(object.mesh).unwrap().bounding_box().unwrap();
            assert!(
                bounds.center().abs_diff_eq(Vec3::ZERO, 1e-5),
                "{s:?} centered at {}",
                bounds.center()
            );
        }
    }

    #[test]
    fn populate_matches_placements_for_same_seed() {
        let (mut scene, font, text, fill) = setup();
        let config = PopulateConfig::default();
        populate(&mut scene, &font, text, fill, &config, &mut StdRng::seed_from_u64(11)).unwrap();
        let expected = place_objects(&config, &mut StdRng::seed_from_u64(11));
        for (object, placement) in scene.objects()[1..].iter().zip(&expected) {
            assert_eq!(object.transform, placement.transform());
        }
    }

    #[test]
    fn populate_runs_once() {
        let (mut scene, font, text, fill) = setup();
        let config = PopulateConfig {
            object_count: 4,
            ..PopulateConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        populate(&mut scene, &font, text, fill, &config, &mut rng).unwrap();
        let len = scene.len();
        assert!(matches!(
            populate(&mut scene, &font, text, fill, &config, &mut rng),
            Err(SceneError::AlreadyPopulated)
        ));
        assert_eq!(scene.len(), len);
    }

    #[test]
    fn unknown_material_inserts_nothing() {
        let (mut scene, font, text, _) = setup();
        let result = populate(
            &mut scene,
            &font,
            text,
            MaterialHandle(99),
            &PopulateConfig::default(),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SceneError::UnknownMaterial(MaterialHandle(99)))));
        assert!(scene.is_empty());
        assert!(!scene.is_populated());
    }

    #[test]
    fn config_validation() {
        assert!(PopulateConfig::default().validate().is_ok());
        let zero_spread = PopulateConfig {
            spread: 0.0,
            ..PopulateConfig::default()
        };
        assert!(zero_spread.validate().is_ok());

        let bad = [
            PopulateConfig {
                spread: -1.0,
                ..PopulateConfig::default()
            },
            PopulateConfig {
                min_distance: -0.5,
                ..PopulateConfig::default()
            },
            PopulateConfig {
                min_distance: 0.0,
                ..PopulateConfig::default()
            },
            PopulateConfig {
                cube_size: -1.0,
                ..PopulateConfig::default()
            },
            PopulateConfig {
                spread: f32::NAN,
                ..PopulateConfig::default()
            },
            PopulateConfig {
                torus: TorusProfile {
                    tube: 0.0,
                    ..TorusProfile::default()
                },
                ..PopulateConfig::default()
            },
        ];
        for config in &bad {
            assert!(
                matches!(config.validate(), Err(SceneError::InvalidConfig(_))),
                "{config:?} accepted"
            );
        }
    }

    #[test]
    fn invalid_config_inserts_nothing() {
        let (mut scene, font, text, fill) = setup();
        let config = PopulateConfig {
            cube_size: -1.0,
            ..PopulateConfig::default()
        };
        let result = populate(
            &mut scene,
            &font,
            text,
            fill,
            &config,
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SceneError::InvalidConfig(_))));
        assert!(scene.is_empty());
        assert!(!scene.is_populated());
        assert!(scene.meshes().is_empty());
    }
}
