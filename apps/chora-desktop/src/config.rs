use anyhow::{Context, Result};
use chora_scene::PopulateConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window, asset and scene settings. Every field is optional in the JSON
/// file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub title: String,
    /// Initial logical window size.
    pub width: u32,
    pub height: u32,
    pub font: String,
    pub text_matcap: String,
    pub fill_matcap: String,
    pub seed: Option<u64>,
    pub populate: PopulateConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Chora Club".into(),
            width: 1280,
            height: 720,
            font: "/fonts/helvetiker_regular.typeface.json".into(),
            text_matcap: "textures/matcaps/9.jpg".into(),
            fill_matcap: "textures/matcaps/11.jpg".into(),
            seed: None,
            populate: PopulateConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// CLI seed first, then the config file's, then fresh entropy.
    pub fn resolve_seed(&self, cli: Option<u64>) -> u64 {
        cli.or(self.seed).unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_scene_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.title, "Chora Club");
        assert_eq!(config.text_matcap, "textures/matcaps/9.jpg");
        assert_eq!(config.fill_matcap, "textures/matcaps/11.jpg");
        assert_eq!(config.populate.object_count, 300);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        std::fs::write(
            &path,
            r#"{ "seed": 7, "populate": { "text": "Hello", "object_count": 12 } }"#,
        )
        .unwrap();

        let config = DemoConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.populate.text, "Hello");
        assert_eq!(config.populate.object_count, 12);
        assert_eq!(config.populate.min_distance, 0.5);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn load_reports_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = DemoConfig::load(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(DemoConfig::load(&broken).is_err());
    }

    #[test]
    fn seed_precedence() {
        let config = DemoConfig {
            seed: Some(5),
            ..DemoConfig::default()
        };
        assert_eq!(config.resolve_seed(Some(9)), 9);
        assert_eq!(config.resolve_seed(None), 5);
    }
}
