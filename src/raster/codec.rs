//! Lossless PNG encode/decode for surfaces.
//!
//! History snapshots and on-disk sessions store each layer's pixels as a
//! self-contained PNG so a snapshot can be restored without access to any
//! other layer or document state.

use std::io::Cursor;

use super::surface::PixelSurface;
use crate::error::RasterError;

/// Encodes a surface as PNG bytes.
pub fn to_png_bytes(surface: &PixelSurface) -> Result<Vec<u8>, RasterError> {
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), surface.data().to_vec())
        .expect("surface buffer length invariant");
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(RasterError::PngEncode)?;
    Ok(bytes)
}

/// Decodes PNG bytes back into a surface.
///
/// Failure here means the persisted document cannot be restored; callers
/// surface the error instead of substituting a blank layer.
pub fn from_png_bytes(bytes: &[u8]) -> Result<PixelSurface, RasterError> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(RasterError::PngDecode)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelSurface::from_raw(width, height, rgba.into_raw())
}
