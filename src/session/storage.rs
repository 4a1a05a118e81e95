//! Reading and writing persisted documents with locking and rotation.

use anyhow::{Context, Result};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::options::{CompressionMode, SessionOptions};
use crate::history::DocumentSnapshot;

const CURRENT_VERSION: u32 = 1;

/// On-disk envelope around a document snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    last_modified: String,
    document: DocumentSnapshot,
}

/// Summary of what is currently stored on disk.
#[derive(Debug)]
pub struct SessionInspection {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub compressed: bool,
    pub last_modified: String,
    pub layer_count: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Result of clearing stored session files.
#[derive(Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Files existed and were removed.
    Removed,
    /// Nothing was stored.
    NothingStored,
}

/// Persist the provided snapshot to disk according to the configured
/// options.
///
/// The write is atomic (temp file, sync, rename), guarded by an exclusive
/// advisory lock, and rotates the previous file to `.bak` when backup
/// retention is enabled.
pub fn save_document(snapshot: &DocumentSnapshot, options: &SessionOptions) -> Result<()> {
    if !options.enabled {
        debug!("Session persistence disabled; skipping save");
        return Ok(());
    }

    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create session directory {}",
            options.base_dir.display()
        )
    })?;

    let lock_path = options.lock_file_path();
    let lock_file = open_lock_file(&lock_path)?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock session file {}", lock_path.display()))?;

    let result = save_document_inner(snapshot, options);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    result
}

fn save_document_inner(snapshot: &DocumentSnapshot, options: &SessionOptions) -> Result<()> {
    let session_path = options.session_file_path();
    let backup_path = options.backup_file_path();

    let payload = SessionFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        document: snapshot.clone(),
    };

    let mut json_bytes =
        serde_json::to_vec_pretty(&payload).context("failed to serialise session payload")?;

    if json_bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "Session data size {} bytes exceeds the configured limit of {} bytes; skipping save",
            json_bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(());
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => (json_bytes.len() as u64) >= options.auto_compress_threshold_bytes,
    };

    if should_compress {
        json_bytes = compress_bytes(&json_bytes)?;
    }

    let tmp_path = temp_path(&session_path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "failed to open temporary session file {}",
                    tmp_path.display()
                )
            })?;
        tmp_file
            .write_all(&json_bytes)
            .context("failed to write session payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary session file")?;
    }

    if session_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&session_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous session file {} -> {}",
                    session_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&session_path).ok();
        }
    }

    fs::rename(&tmp_path, &session_path).with_context(|| {
        format!(
            "failed to move temporary session file {} -> {}",
            tmp_path.display(),
            session_path.display()
        )
    })?;

    info!(
        "Document saved to {} ({} bytes, compression={})",
        session_path.display(),
        json_bytes.len(),
        should_compress
    );

    Ok(())
}

/// Attempt to load a previously saved document.
///
/// Returns `Ok(None)` when persistence is disabled or nothing is stored;
/// corrupt or oversized files are errors, not silently empty documents.
pub fn load_document(options: &SessionOptions) -> Result<Option<DocumentSnapshot>> {
    if !options.enabled {
        debug!("Session persistence disabled; skipping load");
        return Ok(None);
    }

    let session_path = options.session_file_path();
    if !session_path.exists() {
        debug!(
            "No session file present at {}, skipping load",
            session_path.display()
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&session_path)
        .with_context(|| format!("failed to stat session file {}", session_path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Session file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            session_path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

    let lock_path = options.lock_file_path();
    let lock_file = open_lock_file(&lock_path)?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let result = read_session_file(&session_path);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    let (payload, _) = result?;
    Ok(Some(payload.document))
}

/// Report what is stored on disk without restoring it.
pub fn inspect_session(options: &SessionOptions) -> Result<Option<SessionInspection>> {
    let session_path = options.session_file_path();
    if !session_path.exists() {
        return Ok(None);
    }
    let metadata = fs::metadata(&session_path)
        .with_context(|| format!("failed to stat session file {}", session_path.display()))?;
    let (payload, compressed) = read_session_file(&session_path)?;
    Ok(Some(SessionInspection {
        path: session_path,
        size_bytes: metadata.len(),
        compressed,
        last_modified: payload.last_modified,
        layer_count: payload.document.layers.len(),
        canvas_width: payload.document.canvas_width,
        canvas_height: payload.document.canvas_height,
    }))
}

/// Remove stored session files (document, backup, and lock).
pub fn clear_session(options: &SessionOptions) -> Result<ClearOutcome> {
    let mut removed = false;
    for path in [
        options.session_file_path(),
        options.backup_file_path(),
        options.lock_file_path(),
    ] {
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            removed = true;
        }
    }
    Ok(if removed {
        ClearOutcome::Removed
    } else {
        ClearOutcome::NothingStored
    })
}

fn read_session_file(session_path: &Path) -> Result<(SessionFile, bool)> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(session_path)
            .with_context(|| format!("failed to open session file {}", session_path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read session file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress session file")?;
        out
    } else {
        file_bytes
    };

    let payload: SessionFile =
        serde_json::from_slice(&decompressed).context("failed to parse session json")?;
    Ok((payload, compressed))
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("failed to open session lock file {}", lock_path.display()))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress session payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed session payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    target.with_extension("json.tmp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::raster::color::RED;
    use crate::tool::{GestureEvent, ToolKind};

    fn options(dir: &Path) -> SessionOptions {
        SessionOptions::new(dir.to_path_buf())
    }

    fn painted_snapshot() -> DocumentSnapshot {
        let mut doc = Document::new(16, 16, 10).unwrap();
        doc.stack_mut().create_layer(Some("ink"));
        doc.set_tool(ToolKind::Brush {
            color: RED,
            size: 3,
        });
        doc.pointer_event(GestureEvent::start(3, 3)).unwrap();
        doc.pointer_event(GestureEvent::moved(12, 12)).unwrap();
        doc.pointer_event(GestureEvent::end(12, 12)).unwrap();
        doc.snapshot("persisted").unwrap()
    }

    #[test]
    fn save_then_load_round_trips_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        let snapshot = painted_snapshot();

        save_document(&snapshot, &options).unwrap();
        let loaded = load_document(&options).unwrap().expect("document stored");

        assert_eq!(loaded.canvas_width, 16);
        assert_eq!(loaded.layers.len(), 2);
        assert_eq!(loaded.layers[1].name, "ink");
        assert_eq!(loaded.layers[1].pixel_data, snapshot.layers[1].pixel_data);
    }

    #[test]
    fn load_without_a_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_document(&options(dir.path())).unwrap().is_none());
    }

    #[test]
    fn forced_compression_writes_gzip_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path());
        options.compression = CompressionMode::On;
        let snapshot = painted_snapshot();

        save_document(&snapshot, &options).unwrap();

        let raw = fs::read(options.session_file_path()).unwrap();
        assert!(is_gzip(&raw));
        let loaded = load_document(&options).unwrap().expect("document stored");
        assert_eq!(loaded.layers.len(), 2);
    }

    #[test]
    fn second_save_rotates_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        let snapshot = painted_snapshot();

        save_document(&snapshot, &options).unwrap();
        save_document(&snapshot, &options).unwrap();
        assert!(options.backup_file_path().exists());
    }

    #[test]
    fn oversized_snapshot_is_skipped_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path());
        options.max_file_size_bytes = 32;
        let snapshot = painted_snapshot();

        save_document(&snapshot, &options).unwrap();
        assert!(!options.session_file_path().exists());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_blank_document() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        fs::create_dir_all(&options.base_dir).unwrap();
        fs::write(options.session_file_path(), b"{ not json").unwrap();

        assert!(load_document(&options).is_err());
    }

    #[test]
    fn inspect_and_clear_report_stored_state() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        assert!(inspect_session(&options).unwrap().is_none());
        assert_eq!(
            clear_session(&options).unwrap(),
            ClearOutcome::NothingStored
        );

        save_document(&painted_snapshot(), &options).unwrap();
        let info = inspect_session(&options).unwrap().expect("stored");
        assert_eq!(info.layer_count, 2);
        assert_eq!(info.canvas_width, 16);

        assert_eq!(clear_session(&options).unwrap(), ClearOutcome::Removed);
        assert!(inspect_session(&options).unwrap().is_none());
    }

    #[test]
    fn loaded_snapshot_restores_into_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        save_document(&painted_snapshot(), &options).unwrap();

        let loaded = load_document(&options).unwrap().expect("document stored");
        let mut doc = Document::new(16, 16, 10).unwrap();
        doc.restore_snapshot(&loaded).unwrap();

        assert_eq!(doc.stack().len(), 2);
        let out = doc.render();
        assert_eq!(out.pixel(8, 8).unwrap(), RED);
    }
}
