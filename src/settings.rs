//! Driver settings
//!
//! Settings are read from the path given on the command line, or from
//! `~/.config/ember/settings.toml`. Missing or malformed files fall back to
//! defaults. ECS capacities are compile-time constants and not configurable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ember_core::Material;
use ember_ecs::MAX_OBJECTS;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All driver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmberSettings {
    pub log: LogSettings,
    pub scene: SceneSettings,
}

impl EmberSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ember"))
    }

    /// Get the default settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path`, or the default location, or return defaults.
    ///
    /// Nothing is logged here. Log the returned origin once a subscriber is
    /// installed.
    pub fn load(path: Option<&Path>) -> (Self, SettingsOrigin) {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::settings_path) else {
            return (Self::default(), SettingsOrigin::NoConfigDir);
        };

        if !path.exists() {
            return (Self::default(), SettingsOrigin::Missing(path));
        }

        match Self::read(&path) {
            Ok(settings) => (settings, SettingsOrigin::File(path)),
            Err(e) => (Self::default(), SettingsOrigin::Invalid(e)),
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {path:?}"))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {path:?}"))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the driver cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let scene = &self.scene;
        if scene.frames == 0 {
            bail!("scene.frames must be at least 1");
        }
        if scene.objects > MAX_OBJECTS {
            bail!(
                "scene.objects is {} but at most {} objects can be alive",
                scene.objects,
                MAX_OBJECTS
            );
        }
        if !(scene.spacing.is_finite() && scene.spacing > 0.0) {
            bail!("scene.spacing must be a positive number");
        }
        scene
            .material
            .validate()
            .context("scene.material is invalid")?;
        Ok(())
    }
}

/// Where [`EmberSettings::load`] got its settings from
#[derive(Debug)]
pub enum SettingsOrigin {
    File(PathBuf),
    Missing(PathBuf),
    NoConfigDir,
    Invalid(anyhow::Error),
}

impl SettingsOrigin {
    pub fn log(&self) {
        match self {
            Self::File(path) => info!("Loaded settings from {:?}", path),
            Self::Missing(path) => info!("No settings file at {:?}, using defaults", path),
            Self::NoConfigDir => warn!("Could not determine config directory, using defaults"),
            Self::Invalid(e) => warn!("{:#}, using defaults", e),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Include module targets in log lines
    pub targets: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            targets: false,
        }
    }
}

/// Demo scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Objects spawned at startup
    pub objects: usize,
    /// Frames to simulate
    pub frames: u32,
    /// Every n-th object also gets a material (0 = none)
    pub material_every: usize,
    /// Destroy and respawn one object every n frames (0 = never)
    pub churn_every: u32,
    /// Grid spacing between spawned objects
    pub spacing: f32,
    /// RNG seed for spin rates
    pub seed: u64,
    /// Material attached to renderable objects
    pub material: Material,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            objects: 256,
            frames: 120,
            material_every: 2,
            churn_every: 4,
            spacing: 2.0,
            seed: 0,
            material: Material::diffuse(0.6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EmberSettings::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = EmberSettings::from_toml(
            r#"
            [scene]
            objects = 10

            [scene.material]
            metallic = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.scene.objects, 10);
        assert_eq!(settings.scene.frames, 120);
        assert_eq!(settings.scene.material.metallic, 1.0);
        assert_eq!(settings.scene.material.roughness, 0.0);
        assert_eq!(settings.log.level, "info");
        settings.validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = EmberSettings::default();
        settings.scene.objects = MAX_OBJECTS + 1;
        assert!(settings.validate().is_err());

        let mut settings = EmberSettings::default();
        settings.scene.frames = 0;
        assert!(settings.validate().is_err());

        let mut settings = EmberSettings::default();
        settings.scene.material.sheen = 2.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(EmberSettings::from_toml("scene = 3").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let (settings, origin) =
            EmberSettings::load(Some(Path::new("/nonexistent/ember/settings.toml")));
        assert_eq!(settings.scene.objects, SceneSettings::default().objects);
        assert!(matches!(origin, SettingsOrigin::Missing(_)));
    }

    #[test]
    fn file_settings_are_loaded() {
        let path = std::env::temp_dir().join(format!("ember-settings-{}.toml", std::process::id()));
        fs::write(&path, "[scene]\nobjects = 12\n").unwrap();
        let (settings, origin) = EmberSettings::load(Some(&path));
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.scene.objects, 12);
        assert!(matches!(origin, SettingsOrigin::File(p) if p == path));
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = std::env::temp_dir().join(format!("ember-bad-{}.toml", std::process::id()));
        fs::write(&path, "scene = 3").unwrap();
        let (settings, origin) = EmberSettings::load(Some(&path));
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.scene.objects, SceneSettings::default().objects);
        let SettingsOrigin::Invalid(e) = &origin else {
            panic!("expected a parse failure, got {origin:?}");
        };
        assert!(format!("{e:#}").contains("Failed to parse"));
    }
}
