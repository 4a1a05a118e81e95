//! Whole-document snapshots captured for undo/redo and persistence.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::composite::BlendMode;
use crate::error::RasterError;
use crate::layer::{Layer, LayerEffect, LayerKind, LayerStack};
use crate::raster::codec;

/// Serialized form of one layer.
///
/// `pixel_data` is a base64-encoded PNG: a self-contained lossless raster
/// that can be restored with no access to any other layer or document
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub visible: bool,
    pub locked: bool,
    pub opacity: u8,
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub effects: Vec<LayerEffect>,
    pub pixel_data: String,
}

/// A deep, independent copy of the whole document at one instant.
///
/// Mutating the live [`LayerStack`] after capture never alters a snapshot:
/// pixel content is re-encoded at capture time and every metadata field is
/// an owned copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Capture time, RFC 3339.
    pub timestamp: String,
    /// Human-readable description ("Brush stroke", "Delete layer", ...).
    pub description: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub layers: Vec<LayerSnapshot>,
    /// Active layer index at capture time.
    #[serde(default)]
    pub active_layer: usize,
}

impl DocumentSnapshot {
    /// Captures the current stack into an independent snapshot.
    pub fn capture(description: &str, stack: &LayerStack) -> Result<Self, RasterError> {
        let mut layers = Vec::with_capacity(stack.len());
        for layer in stack.layers() {
            layers.push(LayerSnapshot {
                id: layer.id(),
                name: layer.name.clone(),
                kind: layer.kind(),
                visible: layer.visible,
                locked: layer.locked,
                opacity: layer.opacity(),
                blend_mode: layer.blend_mode(),
                effects: layer.effects.clone(),
                pixel_data: BASE64.encode(codec::to_png_bytes(layer.surface())?),
            });
        }
        Ok(Self {
            timestamp: Utc::now().to_rfc3339(),
            description: description.to_string(),
            canvas_width: stack.width(),
            canvas_height: stack.height(),
            layers,
            active_layer: stack.active_index(),
        })
    }

    /// Decodes every layer back into live form.
    ///
    /// Fails hard on corrupt pixel data or a dimension mismatch; a
    /// document that cannot be restored faithfully is reported, never
    /// silently patched with blank layers.
    pub fn decode_layers(&self) -> Result<Vec<Layer>, RasterError> {
        let mut layers = Vec::with_capacity(self.layers.len());
        for entry in &self.layers {
            let bytes = BASE64.decode(&entry.pixel_data)?;
            let surface = codec::from_png_bytes(&bytes)?;
            if surface.width() != self.canvas_width || surface.height() != self.canvas_height {
                return Err(RasterError::SnapshotDimensions {
                    name: entry.name.clone(),
                    width: self.canvas_width,
                    height: self.canvas_height,
                    got_width: surface.width(),
                    got_height: surface.height(),
                });
            }
            layers.push(Layer::restored(
                entry.id,
                entry.name.clone(),
                entry.kind,
                entry.visible,
                entry.locked,
                entry.opacity,
                entry.blend_mode,
                entry.effects.clone(),
                surface,
            ));
        }
        Ok(layers)
    }
}
