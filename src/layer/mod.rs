//! Layer data model: individual layers, effects, and the ordered stack.
//!
//! - [`Layer`]: one pixel surface plus compositing metadata
//! - [`LayerKind`]: background vs. ordinary pixel layers
//! - [`LayerEffect`]: non-destructive decorations applied at composite time
//! - [`LayerStack`]: the ordered collection and its structural operations

pub mod effect;
#[allow(clippy::module_inception)]
pub mod layer;
pub mod stack;

// Re-export commonly used types at module level
pub use effect::LayerEffect;
pub use layer::{Layer, LayerKind};
pub use stack::LayerStack;
