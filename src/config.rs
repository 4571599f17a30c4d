//! Tunables read from a RON file at startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effects::{DisintegrateConfig, EffectKind, HighlightConfig, TintConfig, VisualizerConfig};
use crate::interaction::AimSource;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "assets/hologram_fx.ron";

/// Errors from loading an [`FxConfig`] file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid RON for [`FxConfig`].
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Input bindings and aiming.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    pub toggle_key: KeyCode,
    pub primary_button: MouseButton,
    pub secondary_button: MouseButton,
    pub key_a: KeyCode,
    pub key_b: KeyCode,
    /// Longest aim ray
    pub max_distance: f32,
    /// Avian layer bits the aim ray hits
    pub layer_mask: u32,
    pub aim: AimSource,
    /// Swap which mode frees the cursor
    pub invert_cursor: bool,
    pub start_active: bool,
    /// Handle added to hovered entities that have none; `None` disables it
    pub auto_inject: Option<EffectKind>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            toggle_key: KeyCode::KeyM,
            primary_button: MouseButton::Left,
            secondary_button: MouseButton::Right,
            key_a: KeyCode::KeyN,
            key_b: KeyCode::KeyB,
            max_distance: 1000.0,
            layer_mask: u32::MAX,
            aim: AimSource::Cursor,
            invert_cursor: false,
            start_active: false,
            auto_inject: Some(EffectKind::Highlight),
        }
    }
}

/// Every tunable of the plugin.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FxConfig {
    pub interaction: InteractionConfig,
    pub highlight: HighlightConfig,
    pub disintegrate: DisintegrateConfig,
    pub visualizer: VisualizerConfig,
    pub tint: TintConfig,
}

impl FxConfig {
    pub fn from_ron(content: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::from_ron(&content, path)
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded effect config");
                config
            }
            Err(ConfigError::NotFound(path)) => {
                info!("No effect config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("{err}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let content = r#"(
            interaction: (
                toggle_key: KeyI,
                aim: ViewportCenter,
                auto_inject: Some(Tint),
            ),
            disintegrate: (
                dissolve_duration: 0.5,
                fragment_count: 12,
            ),
        )"#;
        let config = FxConfig::from_ron(content, Path::new("test.ron")).unwrap();
        assert_eq!(config.interaction.toggle_key, KeyCode::KeyI);
        assert_eq!(config.interaction.aim, AimSource::ViewportCenter);
        assert_eq!(config.interaction.auto_inject, Some(EffectKind::Tint));
        assert_eq!(config.interaction.primary_button, MouseButton::Left);
        assert_eq!(config.disintegrate.dissolve_duration, 0.5);
        assert_eq!(config.disintegrate.fragment_count, 12);
        assert_eq!(config.disintegrate.pulse_duration, 0.5);
        assert_eq!(config.highlight, HighlightConfig::default());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = FxConfig::from_ron("(interaction: 3", Path::new("bad.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.ron"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("definitely/not/here/hologram_fx.ron");
        assert!(matches!(FxConfig::load(path), Err(ConfigError::NotFound(_))));
        assert_eq!(FxConfig::load_or_default(path), FxConfig::default());
    }

    #[test]
    fn bundled_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = FxConfig::load(&path).unwrap();
        assert_eq!(config.interaction.toggle_key, KeyCode::KeyM);
    }
}
