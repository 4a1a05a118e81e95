//! Non-destructive layer effects.

use serde::{Deserialize, Serialize};

use crate::raster::Rgba;

/// A parameterized visual decoration applied at composite time.
///
/// Effects never modify the layer's own pixels; the compositor renders them
/// around (or inside) the layer's contribution on every flatten. The
/// `type` tag keeps persisted documents self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayerEffect {
    /// Offset, blurred shadow of the layer's opaque pixels, drawn beneath it.
    DropShadow {
        dx: i32,
        dy: i32,
        blur: u32,
        color: Rgba,
    },
    /// Shadow cast inward from the layer's edges, drawn on top of it.
    InnerShadow {
        dx: i32,
        dy: i32,
        blur: u32,
        color: Rgba,
    },
    /// Halo radiating outward from the layer's opaque pixels.
    OuterGlow { blur: u32, color: Rgba },
    /// Halo hugging the inside of the layer's edges.
    InnerGlow { blur: u32, color: Rgba },
    /// Solid rim around the layer's opaque pixels.
    Stroke { size: u32, color: Rgba },
}

impl LayerEffect {
    /// True for effects the compositor draws before the layer itself
    /// (shadows and glows that sit underneath the layer's own pixels).
    pub fn renders_below_layer(&self) -> bool {
        matches!(self, Self::DropShadow { .. } | Self::OuterGlow { .. })
    }
}
