//! Tool dispatch: gesture events, tool kinds, and the dispatcher.
//!
//! - [`GestureEvent`]/[`GesturePhase`]: the pointer contract with the UI
//! - [`ToolKind`]: tagged tool variants with their parameters
//! - [`ToolDispatcher`]: one history entry per completed gesture

pub mod dispatcher;
pub mod events;
pub mod kind;

// Re-export commonly used types at module level
pub use dispatcher::ToolDispatcher;
pub use events::{GestureEvent, GesturePhase};
pub use kind::ToolKind;
