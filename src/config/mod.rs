//! Configuration file support.
//!
//! Loads and validates user settings from the configuration file located
//! at `~/.config/rasterlab/config.toml`. Settings include new-document
//! canvas dimensions, history depth, brush defaults, and session
//! persistence behavior.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{BrushConfig, CanvasConfig, HistoryConfig, SessionConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::raster::Rgba;
use crate::raster::color::BLACK;
use crate::tool::ToolKind;
use crate::util;

/// Main configuration structure containing all user settings.
///
/// This is the root type deserialized from the TOML file. Every field has
/// a sensible default and is used when not specified in the file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 1024
/// height = 768
///
/// [history]
/// max_snapshots = 100
///
/// [brush]
/// default_color = "red"
/// default_size = 6
///
/// [session]
/// enabled = true
/// compression = "auto"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// New-document canvas defaults
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Undo/redo depth
    #[serde(default)]
    pub history: HistoryConfig,

    /// Brush defaults
    #[serde(default)]
    pub brush: BrushConfig,

    /// Session persistence behavior
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path (tests, `--config`).
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate_and_clamp();
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file location (`~/.config/rasterlab/config.toml`).
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("rasterlab").join("config.toml"))
    }

    /// Resolved default brush built from the configured color and size.
    pub fn default_tool(&self) -> ToolKind {
        ToolKind::Brush {
            color: self.default_color(),
            size: self.brush.default_size,
        }
    }

    fn default_color(&self) -> Rgba {
        util::name_to_color(&self.brush.default_color).unwrap_or_else(|| {
            log::warn!(
                "Unknown default_color '{}', falling back to black",
                self.brush.default_color
            );
            BLACK
        })
    }

    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning
    /// is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width` / `canvas.height`: 1 - 8192
    /// - `history.max_snapshots`: 1 - 500
    /// - `brush.default_size`: 1 - 100
    /// - `session.backup_retention`: 0 - 10
    fn validate_and_clamp(&mut self) {
        if !(1..=8192).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 1-8192 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(1, 8192);
        }
        if !(1..=8192).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 1-8192 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(1, 8192);
        }

        if !(1..=500).contains(&self.history.max_snapshots) {
            log::warn!(
                "Invalid max_snapshots {}, clamping to 1-500 range",
                self.history.max_snapshots
            );
            self.history.max_snapshots = self.history.max_snapshots.clamp(1, 500);
        }

        if !(1..=100).contains(&self.brush.default_size) {
            log::warn!(
                "Invalid default_size {}, clamping to 1-100 range",
                self.brush.default_size
            );
            self.brush.default_size = self.brush.default_size.clamp(1, 100);
        }

        if self.session.backup_retention > 10 {
            log::warn!(
                "Invalid backup_retention {}, clamping to 0-10 range",
                self.session.backup_retention
            );
            self.session.backup_retention = 10;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.history.max_snapshots, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[brush]\ndefault_color = \"red\"").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.brush.default_color, "red");
        assert_eq!(config.brush.default_size, 4);
        assert_eq!(config.canvas.height, 600);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[canvas]\nwidth = 100000\nheight = 0\n\n[history]\nmax_snapshots = 0"
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.canvas.width, 8192);
        assert_eq!(config.canvas.height, 1);
        assert_eq!(config.history.max_snapshots, 1);
    }

    #[test]
    fn unknown_color_falls_back_to_black() {
        let config = Config {
            brush: BrushConfig {
                default_color: "mauve".to_string(),
                default_size: 4,
            },
            ..Config::default()
        };
        assert!(matches!(
            config.default_tool(),
            ToolKind::Brush { color: BLACK, .. }
        ));
    }
}
