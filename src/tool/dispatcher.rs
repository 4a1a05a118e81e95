//! Gesture routing: pointer events in, layer mutations and history out.

use log::{debug, trace};

use super::events::{GestureEvent, GesturePhase};
use super::kind::ToolKind;
use crate::error::RasterError;
use crate::history::HistoryManager;
use crate::layer::LayerStack;

/// Gesture state machine.
///
/// Tracks whether a pointer interaction is in flight and whether it has
/// actually touched pixels (a gesture over a locked layer is tracked for
/// UI feedback but mutates nothing).
#[derive(Debug)]
enum GestureState {
    /// Waiting for a gesture to start.
    Idle,
    /// Pointer is down; a stroke is in progress.
    Stroking {
        last_x: i32,
        last_y: i32,
        mutated: bool,
    },
}

/// Routes three-phase gestures to the active tool against the active
/// layer, and guarantees exactly one history entry per completed gesture.
///
/// Contract highlights:
/// - intermediate `Move` events never record history (a stroke is one
///   undoable unit, not one per pixel-move);
/// - a locked active layer suppresses all mutation and, since nothing
///   changed, the gesture records no history either;
/// - a cancelled gesture leaves whatever partial stroke was drawn (the
///   layer stays valid and renderable) but records no history.
#[derive(Debug)]
pub struct ToolDispatcher {
    tool: ToolKind,
    state: GestureState,
}

impl ToolDispatcher {
    /// Creates a dispatcher with the given initial tool.
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            state: GestureState::Idle,
        }
    }

    /// The currently selected tool.
    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switches tools. An in-flight gesture is discarded, mirroring
    /// `cancel`: no half-stroke may continue under a different tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if matches!(self.state, GestureState::Stroking { .. }) {
            debug!("Tool changed mid-gesture; discarding the active stroke");
            self.state = GestureState::Idle;
        }
        self.tool = tool;
    }

    /// True while a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Stroking { .. })
    }

    /// Feeds one pointer event through the dispatcher.
    ///
    /// Returns `true` when layer pixels may have changed and the caller
    /// should re-render.
    pub fn dispatch(
        &mut self,
        event: GestureEvent,
        stack: &mut LayerStack,
        history: &mut HistoryManager,
    ) -> Result<bool, RasterError> {
        match event.phase {
            GesturePhase::Start => Ok(self.on_start(event.x, event.y, stack)),
            GesturePhase::Move => Ok(self.on_move(event.x, event.y, stack)),
            GesturePhase::End => self.on_end(event.x, event.y, stack, history),
        }
    }

    /// Discards an in-progress gesture without recording history.
    ///
    /// Pixels already written by the partial stroke stay as they are; the
    /// layer remains valid and renderable.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Gesture cancelled");
            self.state = GestureState::Idle;
        }
    }

    fn on_start(&mut self, x: i32, y: i32, stack: &mut LayerStack) -> bool {
        if self.is_active() {
            // A second Start without an End: drop the stale gesture.
            trace!("Gesture restarted without end; discarding previous");
        }
        let locked = stack.active_layer().locked;
        let mut mutated = false;
        if locked {
            trace!("Gesture started on locked layer '{}'", stack.active_layer().name);
        } else {
            self.tool.apply_segment(stack.active_layer_mut(), x, y, x, y);
            mutated = true;
        }
        self.state = GestureState::Stroking {
            last_x: x,
            last_y: y,
            mutated,
        };
        mutated
    }

    fn on_move(&mut self, x: i32, y: i32, stack: &mut LayerStack) -> bool {
        let GestureState::Stroking {
            last_x,
            last_y,
            mutated,
        } = &mut self.state
        else {
            trace!("Move event outside a gesture; ignoring");
            return false;
        };

        let (x0, y0) = (*last_x, *last_y);
        *last_x = x;
        *last_y = y;

        if stack.active_layer().locked {
            return false;
        }
        self.tool.apply_segment(stack.active_layer_mut(), x0, y0, x, y);
        *mutated = true;
        true
    }

    fn on_end(
        &mut self,
        x: i32,
        y: i32,
        stack: &mut LayerStack,
        history: &mut HistoryManager,
    ) -> Result<bool, RasterError> {
        let GestureState::Stroking {
            last_x,
            last_y,
            mutated,
        } = std::mem::replace(&mut self.state, GestureState::Idle)
        else {
            trace!("End event outside a gesture; ignoring");
            return Ok(false);
        };

        let mut changed = mutated;
        if !stack.active_layer().locked {
            self.tool.apply_segment(stack.active_layer_mut(), last_x, last_y, x, y);
            changed = true;
        }

        if changed {
            history.save_state(self.tool.description(), stack)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::color::RED;

    fn setup() -> (LayerStack, HistoryManager, ToolDispatcher) {
        let mut stack = LayerStack::new(16, 16).unwrap();
        stack.create_layer(Some("A"));
        let history = HistoryManager::new(10, &stack).unwrap();
        let dispatcher = ToolDispatcher::new(ToolKind::Brush {
            color: RED,
            size: 2,
        });
        (stack, history, dispatcher)
    }

    fn run_stroke(
        dispatcher: &mut ToolDispatcher,
        stack: &mut LayerStack,
        history: &mut HistoryManager,
    ) {
        dispatcher
            .dispatch(GestureEvent::start(2, 2), stack, history)
            .unwrap();
        for x in 3..10 {
            dispatcher
                .dispatch(GestureEvent::moved(x, x), stack, history)
                .unwrap();
        }
        dispatcher
            .dispatch(GestureEvent::end(10, 10), stack, history)
            .unwrap();
    }

    #[test]
    fn one_gesture_records_exactly_one_history_entry() {
        let (mut stack, mut history, mut dispatcher) = setup();
        let before = history.len();
        run_stroke(&mut dispatcher, &mut stack, &mut history);
        assert_eq!(history.len(), before + 1);
        assert_eq!(history.current_snapshot().description, "Brush stroke");
    }

    #[test]
    fn stroke_actually_paints_the_active_layer() {
        let (mut stack, mut history, mut dispatcher) = setup();
        run_stroke(&mut dispatcher, &mut stack, &mut history);
        assert!(stack.layer(1).unwrap().surface().pixel(5, 5).unwrap().a > 0);
        // The background stays untouched.
        assert_eq!(
            stack.layer(0).unwrap().surface().pixel(5, 5).unwrap(),
            crate::raster::color::WHITE
        );
    }

    #[test]
    fn locked_layer_suppresses_mutation_and_history() {
        let (mut stack, mut history, mut dispatcher) = setup();
        stack.toggle_lock(1);
        let before_pixels = stack.layer(1).unwrap().surface().data().to_vec();
        let before_history = history.len();

        run_stroke(&mut dispatcher, &mut stack, &mut history);

        assert_eq!(stack.layer(1).unwrap().surface().data(), &before_pixels[..]);
        assert_eq!(history.len(), before_history);
    }

    #[test]
    fn cancel_discards_the_gesture_without_history() {
        let (mut stack, mut history, mut dispatcher) = setup();
        let before = history.len();
        dispatcher
            .dispatch(GestureEvent::start(2, 2), &mut stack, &mut history)
            .unwrap();
        dispatcher
            .dispatch(GestureEvent::moved(5, 5), &mut stack, &mut history)
            .unwrap();
        dispatcher.cancel();

        assert!(!dispatcher.is_active());
        assert_eq!(history.len(), before);

        // A later End without a gesture is ignored.
        let changed = dispatcher
            .dispatch(GestureEvent::end(9, 9), &mut stack, &mut history)
            .unwrap();
        assert!(!changed);
        assert_eq!(history.len(), before);
    }

    #[test]
    fn moves_without_start_are_ignored() {
        let (mut stack, mut history, mut dispatcher) = setup();
        let changed = dispatcher
            .dispatch(GestureEvent::moved(5, 5), &mut stack, &mut history)
            .unwrap();
        assert!(!changed);
        assert_eq!(stack.layer(1).unwrap().surface().pixel(5, 5).unwrap().a, 0);
    }

    #[test]
    fn eraser_gesture_round_trips_with_undo() {
        let (mut stack, mut history, mut dispatcher) = setup();
        run_stroke(&mut dispatcher, &mut stack, &mut history);

        dispatcher.set_tool(ToolKind::Eraser { size: 6 });
        run_stroke(&mut dispatcher, &mut stack, &mut history);
        assert_eq!(stack.layer(1).unwrap().surface().pixel(5, 5).unwrap().a, 0);
        assert_eq!(history.current_snapshot().description, "Erase");

        history.undo(&mut stack).unwrap();
        assert!(stack.layer(1).unwrap().surface().pixel(5, 5).unwrap().a > 0);
    }
}
