//! RGBA color type and predefined color constants.

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, one byte per channel.
///
/// This is the pixel format of every [`crate::raster::PixelSurface`]:
/// channels are not premultiplied, matching typical 2D-canvas semantics.
///
/// # Examples
///
/// ```
/// use rasterlab::raster::Rgba;
/// let red = Rgba { r: 255, g: 0, b: 0, a: 255 };
/// let semi_transparent_blue = Rgba { r: 0, g: 0, b: 255, a: 128 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red component (0 = no red, 255 = full red)
    pub r: u8,
    /// Green component (0 = no green, 255 = full green)
    pub g: u8,
    /// Blue component (0 = no blue, 255 = full blue)
    pub b: u8,
    /// Alpha/transparency (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Rgba {
    /// Creates a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns true if the color contributes nothing when drawn.
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Source-over blend of `self` onto `dst`, both straight alpha.
    ///
    /// Used by the drawing primitives when stamping brush pixels; the
    /// compositor has its own blend-mode-aware path.
    pub fn over(self, dst: Self) -> Self {
        if self.a == 255 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = f32::from(self.a) / 255.0;
        let da = f32::from(dst.a) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return TRANSPARENT;
        }
        let blend = |s: u8, d: u8| -> u8 {
            let s = f32::from(s) / 255.0;
            let d = f32::from(d) / 255.0;
            let c = (s * sa + d * da * (1.0 - sa)) / out_a;
            (c * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color
pub const RED: Rgba = Rgba::opaque(255, 0, 0);

/// Predefined green color
pub const GREEN: Rgba = Rgba::opaque(0, 255, 0);

/// Predefined blue color
pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);

/// Predefined yellow color
pub const YELLOW: Rgba = Rgba::opaque(255, 255, 0);

/// Predefined orange color
pub const ORANGE: Rgba = Rgba::opaque(255, 128, 0);

/// Predefined white color
pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

/// Predefined black color
pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

/// Fully transparent color - the fill of every new pixel layer
pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
