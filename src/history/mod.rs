//! Snapshot-based undo/redo history.
//!
//! - [`DocumentSnapshot`]: deep, self-contained copy of the whole document
//! - [`HistoryManager`]: bounded linear history with suspend/batch support

pub mod manager;
pub mod snapshot;

// Re-export commonly used types at module level
pub use manager::{DEFAULT_MAX_HISTORY, HistoryManager};
pub use snapshot::{DocumentSnapshot, LayerSnapshot};
