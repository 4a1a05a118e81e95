//! Typed failures for the raster editing core.
//!
//! Almost every invalid input in this crate (bad layer index, out-of-range
//! opacity, deleting the background) is handled by clamping or a silent
//! no-op; the variants here cover the few conditions that must be reported
//! to the caller instead of recovered.

use thiserror::Error;

/// Errors that can occur in the raster core.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Surface creation with a zero dimension. A programming error at the
    /// call site, not a recoverable runtime condition.
    #[error("surface dimensions must be positive (got {width}x{height})")]
    InvalidSize { width: u32, height: u32 },

    /// Raw pixel buffer does not match `width * height * 4`.
    #[error("pixel buffer is {got} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        got: usize,
        expected: usize,
    },

    /// PNG encoding of a surface failed.
    #[error("failed to encode surface as PNG")]
    PngEncode(#[source] image::ImageError),

    /// PNG decoding of persisted pixel data failed. The owning document
    /// snapshot cannot be restored; callers must surface this rather than
    /// substitute a blank layer.
    #[error("failed to decode persisted pixel data")]
    PngDecode(#[source] image::ImageError),

    /// Persisted pixel data is not valid base64.
    #[error("pixel data is not valid base64")]
    PixelDataBase64(#[from] base64::DecodeError),

    /// A snapshot layer decoded to dimensions other than the ones recorded
    /// for the document.
    #[error("snapshot layer '{name}' decoded to {got_width}x{got_height}, expected {width}x{height}")]
    SnapshotDimensions {
        name: String,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },

    /// A persisted snapshot violates a structural invariant of the
    /// document (no layers, missing or misplaced background).
    #[error("snapshot is structurally invalid: {reason}")]
    SnapshotInvalid { reason: &'static str },
}
