//! Raster primitives: pixel surfaces, colors, and PNG encoding.
//!
//! This module defines the storage every layer draws into:
//! - [`Rgba`]: straight-alpha RGBA color with predefined constants
//! - [`PixelSurface`]: owned fixed-size buffer with 2D drawing primitives
//! - [`RasterTarget`]: minimal pixel-access trait for display-free testing
//! - [`codec`]: lossless PNG round-tripping for snapshot persistence

pub mod codec;
pub mod color;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Rgba;
pub use surface::{PixelSurface, RasterTarget};

// Re-export color constants for public API (unused internally but part of public interface)
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, RED, TRANSPARENT, WHITE, YELLOW};
