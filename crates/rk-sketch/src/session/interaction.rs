//! Pointer events and the handle-drag state machine

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickKind {
    Move,
    Down,
    Up,
    Click,
    DoubleClick,
}

/// A pointer event already projected onto the sketch plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEvent {
    pub point: DVec3,
    pub kind: PickKind,
}

impl PickEvent {
    pub fn new(kind: PickKind, point: DVec3) -> Self {
        Self { point, kind }
    }

    pub fn moved(point: DVec3) -> Self {
        Self::new(PickKind::Move, point)
    }

    pub fn down(point: DVec3) -> Self {
        Self::new(PickKind::Down, point)
    }

    pub fn up(point: DVec3) -> Self {
        Self::new(PickKind::Up, point)
    }

    pub fn click(point: DVec3) -> Self {
        Self::new(PickKind::Click, point)
    }

    pub fn double_click(point: DVec3) -> Self {
        Self::new(PickKind::DoubleClick, point)
    }
}

/// Keyboard and menu signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Enter
    Finish,
    /// Escape
    Cancel,
    /// Right-click
    ContextMenu,
}

/// What a session did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing listened to the event
    Ignored,
    /// Only the preview changed
    PreviewUpdated,
    /// A point was committed to the pending primitive
    PointAdded,
    /// A finalized primitive was appended to the sketch
    ItemAdded(Uuid),
    /// The primitive was complete but degenerate and was dropped
    Absorbed,
    /// The pending primitive was discarded
    Cancelled,
    DragStarted { item: Uuid, index: usize },
    Dragged,
    DragEnded,
    /// The click that follows a drag was swallowed
    ClickSuppressed,
}

/// Spline handle dragging.
///
/// `Idle → Dragging → SuppressedClick → Idle`. The click a pointer-up
/// produces after a drag must not add a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        item: Uuid,
        index: usize,
    },
    SuppressedClick,
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging { .. })
    }

    /// Pointer released: a drag turns into a pending suppression
    pub fn release(&mut self) -> bool {
        if self.is_dragging() {
            *self = InteractionState::SuppressedClick;
            true
        } else {
            false
        }
    }

    /// Consume a pending suppression. Returns true if the click is swallowed.
    pub fn take_suppressed_click(&mut self) -> bool {
        if *self == InteractionState::SuppressedClick {
            *self = InteractionState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_cycle() {
        let mut state = InteractionState::default();
        assert!(!state.release());
        assert!(!state.take_suppressed_click());

        state = InteractionState::Dragging {
            item: Uuid::new_v4(),
            index: 2,
        };
        assert!(state.is_dragging());
        assert!(state.release());
        assert_eq!(state, InteractionState::SuppressedClick);

        assert!(state.take_suppressed_click());
        assert!(!state.take_suppressed_click());
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn test_pick_kind_names() {
        let kind: PickKind = serde_json::from_str("\"doubleClick\"").expect("valid kind");
        assert_eq!(kind, PickKind::DoubleClick);
    }
}
