//! Gesture events consumed by the dispatcher.

use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture.
///
/// One gesture is a `Start`, any number of `Move`s, and an `End`; the
/// whole sequence is a single undoable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// One pointer event in surface-local pixel coordinates.
///
/// Any zoom/pan unprojection happens before events reach the core; the
/// coordinates here address layer pixels directly (and may legitimately
/// fall outside the canvas, where drawing clips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub x: i32,
    pub y: i32,
}

impl GestureEvent {
    pub fn start(x: i32, y: i32) -> Self {
        Self {
            phase: GesturePhase::Start,
            x,
            y,
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            phase: GesturePhase::Move,
            x,
            y,
        }
    }

    pub fn end(x: i32, y: i32) -> Self {
        Self {
            phase: GesturePhase::End,
            x,
            y,
        }
    }
}
