//! Runtime options for document persistence.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::SessionConfig;

/// Gzip payloads at or past this size when compression is `Auto`.
pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 256 * 1024; // 256 KiB

/// Compression preference for session files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Always write plain JSON.
    Off,
    /// Always write gzip-compressed JSON.
    On,
    /// Write gzip when payload exceeds the configured threshold.
    Auto,
}

/// Runtime options derived from configuration for document persistence.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub base_dir: PathBuf,
    pub enabled: bool,
    pub max_file_size_bytes: u64,
    pub compression: CompressionMode,
    pub auto_compress_threshold_bytes: u64,
    pub backup_retention: usize,
}

impl SessionOptions {
    /// Creates a basic options struct with sensible defaults. Intended
    /// mainly for tests.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            enabled: true,
            max_file_size_bytes: 50 * 1024 * 1024,
            compression: CompressionMode::Auto,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            backup_retention: 1,
        }
    }

    /// Path of the persisted document.
    pub fn session_file_path(&self) -> PathBuf {
        self.base_dir.join("document.json")
    }

    /// Path the previous document rotates to on save.
    pub fn backup_file_path(&self) -> PathBuf {
        self.base_dir.join("document.json.bak")
    }

    /// Advisory-lock file guarding concurrent access.
    pub fn lock_file_path(&self) -> PathBuf {
        self.base_dir.join("document.lock")
    }
}

/// Build runtime session options from configuration values.
pub fn options_from_config(session_cfg: &SessionConfig) -> Result<SessionOptions> {
    let base_dir = dirs::data_local_dir()
        .context("could not determine local data directory")?
        .join("rasterlab");

    let compression = match session_cfg.compression.to_lowercase().as_str() {
        "off" => CompressionMode::Off,
        "on" => CompressionMode::On,
        "auto" => CompressionMode::Auto,
        other => {
            log::warn!("Unknown compression mode '{other}', using auto");
            CompressionMode::Auto
        }
    };

    Ok(SessionOptions {
        base_dir,
        enabled: session_cfg.enabled,
        max_file_size_bytes: session_cfg.max_file_size_bytes,
        compression,
        auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
        backup_retention: session_cfg.backup_retention,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_paths_derive_from_base_dir() {
        let options = SessionOptions::new(PathBuf::from("/tmp/rl"));
        assert_eq!(
            options.session_file_path(),
            PathBuf::from("/tmp/rl/document.json")
        );
        assert_eq!(
            options.backup_file_path(),
            PathBuf::from("/tmp/rl/document.json.bak")
        );
        assert_eq!(
            options.lock_file_path(),
            PathBuf::from("/tmp/rl/document.lock")
        );
    }

    #[test]
    fn unknown_compression_string_falls_back_to_auto() {
        let cfg = SessionConfig {
            compression: "zstd".to_string(),
            ..SessionConfig::default()
        };
        let options = options_from_config(&cfg).unwrap();
        assert_eq!(options.compression, CompressionMode::Auto);
    }
}
