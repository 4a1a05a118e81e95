//! Fixed-size RGBA pixel buffer and the drawing primitives tools rely on.

use super::color::{Rgba, TRANSPARENT};
use crate::error::RasterError;

/// Minimal pixel-access abstraction for compositing targets.
///
/// The compositor and the surface codec only need dimensions plus per-pixel
/// read/write, so they are written against this trait and stay testable
/// without any real display surface behind them.
pub trait RasterTarget {
    /// Target width in pixels.
    fn width(&self) -> u32;
    /// Target height in pixels.
    fn height(&self) -> u32;
    /// Reads one pixel. Callers must pass in-bounds coordinates.
    fn read_pixel(&self, x: u32, y: u32) -> Rgba;
    /// Writes one pixel. Callers must pass in-bounds coordinates.
    fn write_pixel(&mut self, x: u32, y: u32, color: Rgba);
}

/// An owned, fixed-size raster buffer (straight-alpha RGBA, row-major).
///
/// One surface backs each layer. Dimensions are immutable after creation
/// and the invariant `data.len() == width * height * 4` holds for the whole
/// lifetime of the value. Drawing outside the bounds is clipped, never an
/// error: a stroke that wanders off the canvas simply has no visible effect
/// there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelSurface {
    /// Creates a surface pre-filled with `fill`.
    ///
    /// Returns [`RasterError::InvalidSize`] when either dimension is zero;
    /// that is a programming error at the call site, not user input.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSize { width, height });
        }
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[fill.r, fill.g, fill.b, fill.a]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a fully transparent surface (the fill of new pixel layers).
    pub fn transparent(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::new(width, height, TRANSPARENT)
    }

    /// Wraps an existing RGBA buffer, validating its length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                got: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reads the pixel at signed coordinates; `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        Some(Rgba {
            r: self.data[idx],
            g: self.data[idx + 1],
            b: self.data[idx + 2],
            a: self.data[idx + 3],
        })
    }

    /// Writes a pixel, replacing whatever was there. Out-of-bounds writes
    /// are clipped silently.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = color.r;
            self.data[idx + 1] = color.g;
            self.data[idx + 2] = color.b;
            self.data[idx + 3] = color.a;
        }
    }

    /// Draws a pixel with source-over blending (the brush path).
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if color.is_transparent() {
            return;
        }
        if let Some(existing) = self.pixel(x, y) {
            self.set_pixel(x, y, color.over(existing));
        }
    }

    /// Fills the whole surface with one color.
    pub fn fill(&mut self, color: Rgba) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Fills an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x_end = x.saturating_add(w.min(i32::MAX as u32) as i32);
        let y_end = y.saturating_add(h.min(i32::MAX as u32) as i32);
        for py in y.max(0)..y_end.min(self.height as i32) {
            for px in x.max(0)..x_end.min(self.width as i32) {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draws a line from `(x0, y0)` to `(x1, y1)` with the given stroke
    /// width, stamping a filled disc at each step of a Bresenham walk.
    ///
    /// # Arguments
    /// * `color` - Stroke color (blended source-over onto the surface)
    /// * `line_width` - Stroke thickness in pixels (minimum 1)
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba, line_width: u32) {
        let radius = (line_width.max(1) as i32) / 2;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.stamp_disc(x, y, radius, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Clears a disc around `(x, y)` back to full transparency.
    ///
    /// This is the eraser primitive: unlike drawing it writes transparent
    /// pixels directly instead of blending.
    pub fn erase(&mut self, x: i32, y: i32, radius: u32) {
        let r = radius as i32;
        let r_sq = r * r;
        for py in (y - r)..=(y + r) {
            for px in (x - r)..=(x + r) {
                let ddx = px - x;
                let ddy = py - y;
                if ddx * ddx + ddy * ddy <= r_sq {
                    self.set_pixel(px, py, TRANSPARENT);
                }
            }
        }
    }

    /// Stamps a filled disc with source-over blending.
    pub fn stamp_disc(&mut self, x: i32, y: i32, radius: i32, color: Rgba) {
        if radius <= 0 {
            self.blend_pixel(x, y, color);
            return;
        }
        let r_sq = radius * radius;
        for py in (y - radius)..=(y + radius) {
            for px in (x - radius)..=(x + radius) {
                let ddx = px - x;
                let ddy = py - y;
                if ddx * ddx + ddy * ddy <= r_sq {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl RasterTarget for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixel(x as i32, y as i32).unwrap_or(TRANSPARENT)
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.set_pixel(x as i32, y as i32, color);
    }
}
