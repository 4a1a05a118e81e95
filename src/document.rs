//! The explicit editor context tying the subsystems together.
//!
//! There is no ambient global application object: callers construct a
//! [`Document`] and every component hangs off it. UI code talks to the
//! document; the document talks to the stack, history, dispatcher, and
//! compositor.

use log::info;

use crate::composite::Compositor;
use crate::error::RasterError;
use crate::history::{DocumentSnapshot, HistoryManager};
use crate::layer::LayerStack;
use crate::raster::PixelSurface;
use crate::raster::color::BLACK;
use crate::tool::{GestureEvent, ToolDispatcher, ToolKind};

/// Default brush when no tool has been picked yet.
const DEFAULT_TOOL: ToolKind = ToolKind::Brush {
    color: BLACK,
    size: 4,
};

/// One open document: canvas, layer stack, history, and tool routing.
pub struct Document {
    stack: LayerStack,
    history: HistoryManager,
    dispatcher: ToolDispatcher,
    compositor: Compositor,
}

impl Document {
    /// Creates a document with a white background layer and an initial
    /// history snapshot.
    pub fn new(width: u32, height: u32, max_history: usize) -> Result<Self, RasterError> {
        let stack = LayerStack::new(width, height)?;
        let history = HistoryManager::new(max_history, &stack)?;
        info!("New {width}x{height} document");
        Ok(Self {
            stack,
            history,
            dispatcher: ToolDispatcher::new(DEFAULT_TOOL),
            compositor: Compositor::new(),
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.stack.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.stack.height()
    }

    /// The layer stack (structural queries).
    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// Mutable stack access for structural operations.
    ///
    /// Callers making structural edits (create/delete/move/duplicate)
    /// record them via [`Document::save_history`] when done, the same way
    /// tool gestures do on completion.
    pub fn stack_mut(&mut self) -> &mut LayerStack {
        &mut self.stack
    }

    /// The undo/redo history (read-only queries).
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Currently selected tool.
    pub fn tool(&self) -> ToolKind {
        self.dispatcher.tool()
    }

    /// Selects a tool; any in-flight gesture is discarded.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.dispatcher.set_tool(tool);
    }

    /// True while a pointer gesture is in progress.
    pub fn gesture_active(&self) -> bool {
        self.dispatcher.is_active()
    }

    /// Routes one pointer event to the active tool.
    ///
    /// Returns `true` when pixels may have changed and a re-render is due.
    pub fn pointer_event(&mut self, event: GestureEvent) -> Result<bool, RasterError> {
        self.dispatcher
            .dispatch(event, &mut self.stack, &mut self.history)
    }

    /// Discards an in-progress gesture (pointer left the canvas, Escape).
    pub fn cancel_gesture(&mut self) {
        self.dispatcher.cancel();
    }

    /// Records the current state as an undo step.
    pub fn save_history(&mut self, description: &str) -> Result<(), RasterError> {
        self.history.save_state(description, &self.stack)
    }

    /// Groups subsequent edits into a single history entry.
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    /// Ends the batch, recording exactly one history entry.
    pub fn end_batch(&mut self, description: &str) -> Result<(), RasterError> {
        self.history.end_batch(description, &self.stack)
    }

    /// Steps back one history entry; `Ok(false)` at the start of history.
    pub fn undo(&mut self) -> Result<bool, RasterError> {
        self.history.undo(&mut self.stack)
    }

    /// Steps forward one history entry; `Ok(false)` at the end of history.
    pub fn redo(&mut self) -> Result<bool, RasterError> {
        self.history.redo(&mut self.stack)
    }

    /// Flattens the document into one surface.
    pub fn render(&self) -> PixelSurface {
        self.compositor.render(&self.stack)
    }

    /// Captures an independent snapshot of the whole document.
    pub fn snapshot(&self, description: &str) -> Result<DocumentSnapshot, RasterError> {
        DocumentSnapshot::capture(description, &self.stack)
    }

    /// Replaces the whole document from a snapshot (save-file load).
    ///
    /// Atomic: on decode failure the live document is untouched. The
    /// restore itself is never recorded as a new edit.
    pub fn restore_snapshot(&mut self, snapshot: &DocumentSnapshot) -> Result<(), RasterError> {
        self.history.restore(snapshot, &mut self.stack)
    }

    /// Clears back to a single background layer ("new document").
    pub fn reset(&mut self, width: u32, height: u32, max_history: usize) -> Result<(), RasterError> {
        let stack = LayerStack::new(width, height)?;
        let history = HistoryManager::new(max_history, &stack)?;
        self.stack = stack;
        self.history = history;
        self.cancel_gesture();
        info!("Document reset to {width}x{height}");
        Ok(())
    }
}
