//! Document persistence (save/restore) support.
//!
//! Converts document snapshots into a versioned on-disk representation,
//! written with locking, optional compression, and backup rotation, and
//! restores them on startup when requested.

mod options;
mod storage;

#[allow(unused_imports)]
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, SessionOptions, options_from_config,
};
#[allow(unused_imports)]
pub use storage::{
    ClearOutcome, SessionInspection, clear_session, inspect_session, load_document, save_document,
};
