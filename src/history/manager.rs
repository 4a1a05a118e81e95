//! Linear undo/redo over whole-document snapshots.

use log::{debug, trace, warn};

use super::snapshot::DocumentSnapshot;
use crate::error::RasterError;
use crate::layer::LayerStack;

/// Default bound on retained snapshots.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Captures and restores [`DocumentSnapshot`]s with standard linear undo
/// semantics: new edits after an undo discard the redo branch, and the
/// snapshot list is bounded (FIFO eviction of the oldest entries).
///
/// The manager is either *recording* (the default) or *suspended*.
/// Restoration suspends recording around the rebuild so restoring can never
/// recursively record itself as a new edit; `begin_batch`/`end_batch`
/// expose the same mechanism for grouping many small mutations into a
/// single history entry.
#[derive(Debug)]
pub struct HistoryManager {
    snapshots: Vec<DocumentSnapshot>,
    current: usize,
    max_size: usize,
    suspended: u32,
}

impl HistoryManager {
    /// Creates a manager and captures the initial snapshot of `stack`, so
    /// undoing the first real edit lands on a well-defined state.
    pub fn new(max_size: usize, stack: &LayerStack) -> Result<Self, RasterError> {
        let initial = DocumentSnapshot::capture("New document", stack)?;
        Ok(Self {
            snapshots: vec![initial],
            current: 0,
            max_size: max_size.max(1),
            suspended: 0,
        })
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the snapshot describing the current document state.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// False while a restore or an explicit batch is in flight.
    pub fn is_recording(&self) -> bool {
        self.suspended == 0
    }

    /// The snapshot at the current index.
    pub fn current_snapshot(&self) -> &DocumentSnapshot {
        &self.snapshots[self.current]
    }

    /// Records the current document state as a new history entry.
    ///
    /// No-op while suspended. Any snapshots past the current index (the
    /// redo branch) are discarded first; if the list then exceeds the
    /// configured bound the oldest snapshot is evicted.
    pub fn save_state(&mut self, description: &str, stack: &LayerStack) -> Result<(), RasterError> {
        if self.suspended > 0 {
            trace!("History suspended; not recording '{description}'");
            return Ok(());
        }

        self.snapshots.truncate(self.current + 1);
        let snapshot = DocumentSnapshot::capture(description, stack)?;
        self.snapshots.push(snapshot);
        self.current += 1;

        while self.snapshots.len() > self.max_size {
            self.snapshots.remove(0);
            self.current -= 1;
        }
        debug!(
            "Recorded '{description}' ({} of {} snapshots)",
            self.current + 1,
            self.snapshots.len()
        );
        Ok(())
    }

    /// Steps back one snapshot and restores it into `stack`.
    ///
    /// Returns `Ok(false)` without touching anything when already at the
    /// earliest snapshot; that is expected control flow, not an error.
    pub fn undo(&mut self, stack: &mut LayerStack) -> Result<bool, RasterError> {
        if !self.can_undo() {
            trace!("Undo requested at the start of history");
            return Ok(false);
        }
        let target = self.current - 1;
        self.restore_index(target, stack)?;
        self.current = target;
        debug!("Undo to snapshot {target}");
        Ok(true)
    }

    /// Steps forward one snapshot and restores it into `stack`.
    pub fn redo(&mut self, stack: &mut LayerStack) -> Result<bool, RasterError> {
        if !self.can_redo() {
            trace!("Redo requested at the end of history");
            return Ok(false);
        }
        let target = self.current + 1;
        self.restore_index(target, stack)?;
        self.current = target;
        debug!("Redo to snapshot {target}");
        Ok(true)
    }

    /// Rebuilds `stack` from an arbitrary snapshot.
    ///
    /// Recording is suspended for the duration, and the replacement stack
    /// is built completely off to the side before being swapped in: a
    /// failed decode leaves the live stack untouched, and no caller can
    /// ever observe a half-rebuilt document.
    pub fn restore(
        &mut self,
        snapshot: &DocumentSnapshot,
        stack: &mut LayerStack,
    ) -> Result<(), RasterError> {
        self.suspended += 1;
        let result = Self::rebuild_stack(snapshot, stack);
        self.suspended -= 1;
        result
    }

    /// Suspends recording so a run of mutations becomes one history entry.
    pub fn begin_batch(&mut self) {
        self.suspended += 1;
        trace!("History batch started (depth {})", self.suspended);
    }

    /// Resumes recording and captures exactly one snapshot for the batch.
    pub fn end_batch(&mut self, description: &str, stack: &LayerStack) -> Result<(), RasterError> {
        if self.suspended == 0 {
            warn!("end_batch without matching begin_batch");
        } else {
            self.suspended -= 1;
        }
        self.save_state(description, stack)
    }

    fn restore_index(&mut self, index: usize, stack: &mut LayerStack) -> Result<(), RasterError> {
        let snapshot = self.snapshots[index].clone();
        self.restore(&snapshot, stack)
    }

    fn rebuild_stack(snapshot: &DocumentSnapshot, stack: &mut LayerStack) -> Result<(), RasterError> {
        let layers = snapshot.decode_layers()?;
        match layers.first() {
            None => {
                return Err(RasterError::SnapshotInvalid {
                    reason: "no layers",
                });
            }
            Some(bottom) if !bottom.is_background() => {
                return Err(RasterError::SnapshotInvalid {
                    reason: "bottom layer is not the background",
                });
            }
            Some(_) => {}
        }
        if layers.iter().skip(1).any(crate::layer::Layer::is_background) {
            return Err(RasterError::SnapshotInvalid {
                reason: "more than one background layer",
            });
        }
        let rebuilt = LayerStack::rebuild(
            snapshot.canvas_width,
            snapshot.canvas_height,
            layers,
            snapshot.active_layer,
            stack.next_id(),
        );
        *stack = rebuilt;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::color::{RED, WHITE};

    fn setup() -> (LayerStack, HistoryManager) {
        let stack = LayerStack::new(8, 8).unwrap();
        let history = HistoryManager::new(10, &stack).unwrap();
        (stack, history)
    }

    #[test]
    fn construction_captures_the_initial_state() {
        let (_, history) = setup();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_at_start_and_redo_at_end_are_no_ops() {
        let (mut stack, mut history) = setup();
        assert!(!history.undo(&mut stack).unwrap());
        assert!(!history.redo(&mut stack).unwrap());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn undo_then_redo_restores_bit_identical_content() {
        let (mut stack, mut history) = setup();
        stack.create_layer(Some("A"));
        stack.active_layer_mut().draw_line(1, 1, 6, 6, RED, 2);
        history.save_state("Brush stroke", &stack).unwrap();
        let edited = stack.clone();

        assert!(history.undo(&mut stack).unwrap());
        assert_eq!(stack.len(), 1);

        assert!(history.redo(&mut stack).unwrap());
        assert_eq!(stack.len(), edited.len());
        assert_eq!(
            stack.layer(1).unwrap().surface().data(),
            edited.layer(1).unwrap().surface().data()
        );
        assert_eq!(stack.layer(1).unwrap().name, "A");
        assert_eq!(stack.active_index(), edited.active_index());
    }

    #[test]
    fn new_edit_after_undo_discards_the_redo_branch() {
        let (mut stack, mut history) = setup();
        stack.create_layer(Some("A"));
        history.save_state("Add A", &stack).unwrap();
        stack.create_layer(Some("B"));
        history.save_state("Add B", &stack).unwrap();

        history.undo(&mut stack).unwrap();
        history.undo(&mut stack).unwrap();
        stack.create_layer(Some("C"));
        history.save_state("Add C", &stack).unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current_snapshot().description, "Add C");
    }

    #[test]
    fn history_is_bounded_with_fifo_eviction() {
        let stack = LayerStack::new(4, 4).unwrap();
        let mut history = HistoryManager::new(3, &stack).unwrap();
        let mut stack = stack;

        for i in 0..6 {
            stack.create_layer(Some(&format!("L{i}")));
            history.save_state(&format!("Add L{i}"), &stack).unwrap();
            assert!(history.len() <= 3);
        }
        assert_eq!(history.len(), 3);
        // The oldest surviving snapshots are the most recent three edits.
        assert_eq!(history.snapshots[0].description, "Add L3");
        assert_eq!(history.current_snapshot().description, "Add L5");
    }

    #[test]
    fn restore_is_idempotent() {
        let (mut stack, mut history) = setup();
        stack.create_layer(Some("A"));
        stack.active_layer_mut().draw_line(0, 0, 7, 7, RED, 1);
        history.save_state("Brush stroke", &stack).unwrap();
        let snapshot = history.current_snapshot().clone();

        history.restore(&snapshot, &mut stack).unwrap();
        let first = stack.clone();
        history.restore(&snapshot, &mut stack).unwrap();
        assert_eq!(stack, first);
    }

    #[test]
    fn restore_does_not_record_itself() {
        let (mut stack, mut history) = setup();
        stack.create_layer(Some("A"));
        history.save_state("Add A", &stack).unwrap();
        let before = history.len();

        let snapshot = history.current_snapshot().clone();
        history.restore(&snapshot, &mut stack).unwrap();
        assert_eq!(history.len(), before);
        assert!(history.is_recording());
    }

    #[test]
    fn batch_produces_exactly_one_entry() {
        let (mut stack, mut history) = setup();
        history.begin_batch();
        for i in 0..5 {
            stack.create_layer(Some(&format!("L{i}")));
            history.save_state("ignored inside batch", &stack).unwrap();
        }
        history.end_batch("Multi-stroke", &stack).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.current_snapshot().description, "Multi-stroke");
    }

    #[test]
    fn restoring_a_snapshot_without_background_is_rejected() {
        let (mut stack, mut history) = setup();
        let mut snapshot = history.current_snapshot().clone();
        snapshot.layers.clear();
        assert!(matches!(
            history.restore(&snapshot, &mut stack),
            Err(RasterError::SnapshotInvalid { .. })
        ));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn restored_background_pixels_come_back_white() {
        let (mut stack, mut history) = setup();
        stack.layer_mut(0).unwrap().surface_mut().fill(RED);
        history.save_state("Fill background", &stack).unwrap();

        history.undo(&mut stack).unwrap();
        assert_eq!(stack.layer(0).unwrap().surface().pixel(3, 3).unwrap(), WHITE);
    }
}
