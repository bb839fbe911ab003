//! Application configuration.

use peniko::Color;
use plotwise_core::SurfaceConfig;
use plotwise_render::GridStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "PLOTWISE_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "plotwise.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    /// Window background, RGBA.
    pub background: [u8; 4],
    /// Layout JSON file to edit. Changes are written back to it.
    pub layout_path: Option<PathBuf>,
    pub surface: SurfaceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Plotwise".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            background: [250, 250, 250, 255],
            layout_path: None,
            surface: SurfaceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config named by `PLOTWISE_CONFIG`, else `plotwise.json` in the
    /// working directory, else defaults.
    pub fn discover() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_or_default(&path)
    }

    fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn background_color(&self) -> Color {
        let [r, g, b, a] = self.background;
        Color::from_rgba8(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Plotwise");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.grid_style, GridStyle::Lines);
        assert!(config.layout_path.is_none());
        assert!(!config.surface.read_only);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plotwise.json");
        std::fs::write(
            &path,
            r#"{ "title": "Nursery", "grid_style": "dots", "surface": { "read_only": true } }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.title, "Nursery");
        assert_eq!(config.grid_style, GridStyle::Dots);
        assert!(config.surface.read_only);
        assert!((config.surface.zoom_step - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plotwise.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(AppConfig::load_or_default(&path).title, "Plotwise");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Io { .. })));
        assert_eq!(AppConfig::load_or_default(&path).width, 1280);
    }

    #[test]
    fn test_background_color() {
        let config = AppConfig {
            background: [1, 2, 3, 4],
            ..AppConfig::default()
        };
        assert_eq!(config.background_color().to_rgba8().to_u8_array(), [1, 2, 3, 4]);
    }
}
