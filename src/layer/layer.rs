//! A single layer: one pixel surface plus compositing metadata.

use super::effect::LayerEffect;
use crate::composite::BlendMode;
use crate::error::RasterError;
use crate::raster::color::WHITE;
use crate::raster::{PixelSurface, Rgba};
use serde::{Deserialize, Serialize};

/// Structural role of a layer within the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// The opaque base of the document. Exactly one per stack, always at
    /// index 0; cannot be deleted, reordered, or duplicated in place.
    Background,
    /// An ordinary, initially transparent raster layer.
    Pixel,
}

/// One entry in the layer stack.
///
/// Owns its [`PixelSurface`] exclusively; the surface is never shared
/// between layers, which is what makes duplicate-then-edit safe.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: u64,
    /// Display name shown by layer panels.
    pub name: String,
    kind: LayerKind,
    /// Hidden layers are skipped entirely during compositing.
    pub visible: bool,
    /// Locked layers reject all tool mutations (but stay visible).
    pub locked: bool,
    opacity: u8,
    blend: BlendMode,
    /// Ordered non-destructive effects, applied at composite time.
    pub effects: Vec<LayerEffect>,
    mask: Option<PixelSurface>,
    surface: PixelSurface,
}

impl Layer {
    /// Creates the opaque white background layer.
    pub fn background(id: u64, width: u32, height: u32) -> Result<Self, RasterError> {
        Ok(Self {
            id,
            name: "Background".to_string(),
            kind: LayerKind::Background,
            visible: true,
            locked: false,
            opacity: 100,
            blend: BlendMode::Normal,
            effects: Vec::new(),
            mask: None,
            surface: PixelSurface::new(width, height, WHITE)?,
        })
    }

    /// Creates a new fully transparent pixel layer.
    pub fn pixel(id: u64, name: String, width: u32, height: u32) -> Result<Self, RasterError> {
        Ok(Self {
            id,
            name,
            kind: LayerKind::Pixel,
            visible: true,
            locked: false,
            opacity: 100,
            blend: BlendMode::Normal,
            effects: Vec::new(),
            mask: None,
            surface: PixelSurface::transparent(width, height)?,
        })
    }

    /// Rebuilds a layer from restored state (history or disk).
    #[allow(clippy::too_many_arguments)]
    pub fn restored(
        id: u64,
        name: String,
        kind: LayerKind,
        visible: bool,
        locked: bool,
        opacity: u8,
        blend: BlendMode,
        effects: Vec<LayerEffect>,
        surface: PixelSurface,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            visible,
            locked,
            opacity: opacity.min(100),
            blend,
            effects,
            mask: None,
            surface,
        }
    }

    /// Deep copy under a fresh id, used by layer duplication.
    ///
    /// Pixel content, metadata, effects, and mask are all independent
    /// copies; later edits to either layer never touch the other.
    pub fn duplicate_as(&self, id: u64) -> Self {
        Self {
            id,
            name: format!("{} copy", self.name),
            kind: LayerKind::Pixel,
            visible: self.visible,
            locked: self.locked,
            opacity: self.opacity,
            blend: self.blend,
            effects: self.effects.clone(),
            mask: self.mask.clone(),
            surface: self.surface.clone(),
        }
    }

    /// Stable identity, distinct from display order.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Structural role of the layer.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn is_background(&self) -> bool {
        self.kind == LayerKind::Background
    }

    /// Layer opacity in percent (0-100).
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Sets the opacity, clamping to 0-100.
    pub fn set_opacity(&mut self, value: i32) {
        self.opacity = value.clamp(0, 100) as u8;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Sets the blend mode. The background keeps `Normal` unconditionally:
    /// it is the opaque base of every composite.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        if self.is_background() && mode != BlendMode::Normal {
            log::debug!("Ignoring blend mode change on the background layer");
            return;
        }
        self.blend = mode;
    }

    /// The layer's pixel buffer.
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    /// Mutable access for tool operations and restoration.
    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    /// Optional alpha mask (reserved; compositing ignores `None` safely).
    pub fn mask(&self) -> Option<&PixelSurface> {
        self.mask.as_ref()
    }

    /// Installs or removes the alpha mask.
    pub fn set_mask(&mut self, mask: Option<PixelSurface>) {
        self.mask = mask;
    }

    /// Convenience wrapper for the brush primitive on this layer.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba, width: u32) {
        self.surface.draw_line(x0, y0, x1, y1, color, width);
    }

    /// Convenience wrapper for the eraser primitive on this layer.
    pub fn erase(&mut self, x: i32, y: i32, radius: u32) {
        self.surface.erase(x, y, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_blend_mode_is_pinned_to_normal() {
        let mut layer = Layer::background(1, 4, 4).unwrap();
        layer.set_blend_mode(BlendMode::Multiply);
        assert_eq!(layer.blend_mode(), BlendMode::Normal);
    }

    #[test]
    fn pixel_layer_blend_mode_is_editable() {
        let mut layer = Layer::pixel(2, "Layer 1".into(), 4, 4).unwrap();
        layer.set_blend_mode(BlendMode::Screen);
        assert_eq!(layer.blend_mode(), BlendMode::Screen);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut layer = Layer::pixel(2, "Layer 1".into(), 4, 4).unwrap();
        layer.set_opacity(250);
        assert_eq!(layer.opacity(), 100);
        layer.set_opacity(-5);
        assert_eq!(layer.opacity(), 0);
    }

    #[test]
    fn duplicate_is_a_deep_copy() {
        let mut original = Layer::pixel(3, "Art".into(), 8, 8).unwrap();
        original.draw_line(0, 0, 7, 7, crate::raster::color::RED, 1);
        let mut copy = original.duplicate_as(4);

        assert_eq!(copy.surface().data(), original.surface().data());
        assert_eq!(copy.name, "Art copy");

        copy.erase(3, 3, 8);
        assert_ne!(copy.surface().data(), original.surface().data());
    }
}
