//! Ordered layer collection with the active-layer notion.

use log::debug;

use super::layer::Layer;
use crate::composite::BlendMode;
use crate::error::RasterError;

/// The document's ordered sequence of layers.
///
/// Index 0 is always the [`LayerKind::Background`] layer; the sequence is
/// never empty. Every structural operation below preserves that invariant,
/// keeps the active index valid, and hands out ids that are unique for the
/// lifetime of the document. Invalid indices are ignored or clamped, never
/// an error: an interactive session must not crash on a stale panel click.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    active: usize,
    next_id: u64,
}

impl LayerStack {
    /// Creates a stack holding the single opaque-white background layer.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let background = Layer::background(1, width, height)?;
        Ok(Self {
            width,
            height,
            layers: vec![background],
            active: 0,
            next_id: 2,
        })
    }

    /// Rebuilds a stack from restored layers (history/disk).
    ///
    /// `min_next_id` carries the live document's id watermark so restored
    /// documents never hand out an id that an earlier layer already used.
    pub(crate) fn rebuild(
        width: u32,
        height: u32,
        layers: Vec<Layer>,
        active: usize,
        min_next_id: u64,
    ) -> Self {
        let max_id = layers.iter().map(Layer::id).max().unwrap_or(0);
        let active = active.min(layers.len().saturating_sub(1));
        Self {
            width,
            height,
            layers,
            active,
            next_id: min_next_id.max(max_id + 1),
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers including the background.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false: the background layer is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bottom-to-top iteration order (index 0 = background).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Index of the active layer; always valid.
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active]
    }

    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active]
    }

    /// Id watermark for restore bookkeeping.
    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Inserts a new transparent pixel layer directly above the background
    /// (index 1), makes it active, and returns its index.
    pub fn create_layer(&mut self, name: Option<&str>) -> usize {
        let id = self.allocate_id();
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Layer {}", self.layers.len()));
        let layer = Layer::pixel(id, name, self.width, self.height)
            .expect("stack dimensions are validated at construction");
        debug!("Creating layer '{}' (id {id})", layer.name);
        self.layers.insert(1, layer);
        self.active = 1;
        1
    }

    /// Deep-copies the layer at `index` (default: active), inserting the
    /// copy directly above its source and activating it.
    ///
    /// Returns `None` for the background (index 0 is protected) or an
    /// out-of-range index.
    pub fn duplicate_layer(&mut self, index: Option<usize>) -> Option<usize> {
        let index = index.unwrap_or(self.active);
        let source = self.layers.get(index)?;
        if source.is_background() {
            debug!("Refusing to duplicate the background layer");
            return None;
        }
        let id = self.next_id;
        let copy = self.layers[index].duplicate_as(id);
        self.next_id += 1;
        debug!("Duplicated layer {index} as '{}' (id {id})", copy.name);
        self.layers.insert(index + 1, copy);
        if self.active > index {
            self.active += 1;
        }
        self.active = index + 1;
        Some(index + 1)
    }

    /// Removes the layer at `index` (default: active).
    ///
    /// Returns `false` (and changes nothing) for the background or an
    /// out-of-range index. The active index moves to the nearest surviving
    /// neighbor.
    pub fn delete_layer(&mut self, index: Option<usize>) -> bool {
        let index = index.unwrap_or(self.active);
        match self.layers.get(index) {
            Some(layer) if !layer.is_background() => {}
            _ => return false,
        }
        let removed = self.layers.remove(index);
        debug!("Deleted layer '{}' (id {})", removed.name, removed.id());
        if self.active > index {
            self.active -= 1;
        } else if self.active >= self.layers.len() {
            self.active = self.layers.len() - 1;
        }
        true
    }

    /// Makes `index` the active layer; out-of-range requests are ignored
    /// and the previous active index stays in place.
    pub fn set_active_layer(&mut self, index: usize) {
        if index < self.layers.len() {
            self.active = index;
        } else {
            debug!("Ignoring out-of-range active layer index {index}");
        }
    }

    /// Reorders a layer within the stack.
    ///
    /// The background is immovable and nothing may move into its slot, so
    /// `from == 0` is a no-op and `to` is clamped to `1..len`. The active
    /// index tracks the moved element whichever direction it travels.
    pub fn move_layer(&mut self, from: usize, to: usize) {
        if from == 0 || from >= self.layers.len() {
            return;
        }
        let to = to.clamp(1, self.layers.len() - 1);
        if from == to {
            return;
        }
        let layer = self.layers.remove(from);
        debug!("Moving layer '{}' from {from} to {to}", layer.name);
        self.layers.insert(to, layer);

        if self.active == from {
            self.active = to;
        } else if from < self.active && self.active <= to {
            self.active -= 1;
        } else if to <= self.active && self.active < from {
            self.active += 1;
        }
    }

    /// Flips the visibility flag; invalid indices are ignored.
    pub fn toggle_visibility(&mut self, index: usize) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.visible = !layer.visible;
            debug!("Layer {index} visible: {}", layer.visible);
        }
    }

    /// Flips the lock flag; invalid indices are ignored.
    pub fn toggle_lock(&mut self, index: usize) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.locked = !layer.locked;
            debug!("Layer {index} locked: {}", layer.locked);
        }
    }

    /// Sets a layer's opacity, clamped to 0-100.
    pub fn set_opacity(&mut self, index: usize, value: i32) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.set_opacity(value);
        }
    }

    /// Sets a layer's blend mode (pinned to `Normal` for the background).
    pub fn set_blend_mode(&mut self, index: usize, mode: BlendMode) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.set_blend_mode(mode);
        }
    }
}
