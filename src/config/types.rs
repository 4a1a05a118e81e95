//! Configuration section structs.

use serde::{Deserialize, Serialize};

/// Default canvas dimensions for new documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// New-document width in pixels.
    pub width: u32,
    /// New-document height in pixels.
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Undo/redo history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum retained snapshots (FIFO eviction past this bound).
    pub max_snapshots: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_snapshots: 50 }
    }
}

/// Brush defaults applied when a document opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Named default color (see `util::name_to_color`).
    pub default_color: String,
    /// Default brush diameter in pixels.
    pub default_size: u32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            default_color: "black".to_string(),
            default_size: 4,
        }
    }
}

/// Document persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether documents are saved to disk between runs.
    pub enabled: bool,
    /// "off", "on", or "auto" (compress past the size threshold).
    pub compression: String,
    /// How many rotated backups to keep (0 disables rotation).
    pub backup_retention: usize,
    /// Refuse to write or read files larger than this many bytes.
    pub max_file_size_bytes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compression: "auto".to_string(),
            backup_retention: 1,
            max_file_size_bytes: 50 * 1024 * 1024,
        }
    }
}
