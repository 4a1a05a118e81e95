//! Library exports for the rasterlab editing core.
//!
//! Exposes the layer stack, compositor, history, and tool-dispatch
//! subsystems alongside the supporting modules they rely on so that
//! embedding UIs (and the bundled CLI) can share one document model.

pub mod composite;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod layer;
pub mod raster;
pub mod session;
pub mod tool;
pub mod util;

pub use composite::{BlendMode, Compositor};
pub use config::Config;
pub use document::Document;
pub use error::RasterError;
pub use history::{DocumentSnapshot, HistoryManager};
pub use layer::{Layer, LayerEffect, LayerKind, LayerStack};
pub use raster::{PixelSurface, RasterTarget, Rgba};
pub use tool::{GestureEvent, GesturePhase, ToolDispatcher, ToolKind};
