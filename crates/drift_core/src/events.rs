//! Drag event dispatch
//!
//! Widgets receive at most one pointer event per phase per frame. The event
//! carries the screen position together with the projection that was active
//! when it was captured.

use crate::geometry::{Point, Vec2};
use crate::projection::ScreenProjection;

/// Event type identifier
pub type EventType = u32;

/// Drag event types
pub mod event_types {
    use super::EventType;

    /// Pointer pressed and moved past the drag threshold
    pub const DRAG_BEGIN: EventType = 6;
    /// Pointer moved while dragging
    pub const DRAG: EventType = 7;
    /// Pointer released after a drag
    pub const DRAG_END: EventType = 8;
}

/// Phase of a drag gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Begin,
    Move,
    End,
}

impl DragPhase {
    /// Numeric event type for this phase
    pub fn event_type(&self) -> EventType {
        match self {
            DragPhase::Begin => event_types::DRAG_BEGIN,
            DragPhase::Move => event_types::DRAG,
            DragPhase::End => event_types::DRAG_END,
        }
    }
}

/// A pointer event delivered to a drag handler
#[derive(Clone, Copy)]
pub struct PointerEvent<'a> {
    pub phase: DragPhase,
    /// Screen-space pointer position
    pub position: Point,
    /// Screen-space movement since the previous event
    pub delta: Vec2,
    /// Projection used to map `position` into world space
    pub projection: &'a dyn ScreenProjection,
}

impl std::fmt::Debug for PointerEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerEvent")
            .field("phase", &self.phase)
            .field("position", &self.position)
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}

/// Receiver of drag gestures
pub trait DragHandler {
    fn on_begin_drag(&mut self, event: &PointerEvent<'_>);
    fn on_drag(&mut self, event: &PointerEvent<'_>);
    fn on_end_drag(&mut self, event: &PointerEvent<'_>);
}

/// Route an event to the handler method matching its phase
pub fn dispatch<H: DragHandler + ?Sized>(handler: &mut H, event: &PointerEvent<'_>) {
    tracing::trace!(
        "dispatch {:?} at ({:.1}, {:.1})",
        event.phase,
        event.position.x,
        event.position.y
    );
    match event.phase {
        DragPhase::Begin => handler.on_begin_drag(event),
        DragPhase::Move => handler.on_drag(event),
        DragPhase::End => handler.on_end_drag(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ScreenSpace;

    #[derive(Default)]
    struct Recorder {
        phases: Vec<DragPhase>,
    }

    impl DragHandler for Recorder {
        fn on_begin_drag(&mut self, event: &PointerEvent<'_>) {
            self.phases.push(event.phase);
        }
        fn on_drag(&mut self, event: &PointerEvent<'_>) {
            self.phases.push(event.phase);
        }
        fn on_end_drag(&mut self, event: &PointerEvent<'_>) {
            self.phases.push(event.phase);
        }
    }

    #[test]
    fn test_dispatch_routes_by_phase() {
        let mut recorder = Recorder::default();
        for phase in [DragPhase::Begin, DragPhase::Move, DragPhase::End] {
            let event = PointerEvent {
                phase,
                position: Point::ZERO,
                delta: Vec2::ZERO,
                projection: &ScreenSpace,
            };
            dispatch(&mut recorder, &event);
        }
        assert_eq!(
            recorder.phases,
            vec![DragPhase::Begin, DragPhase::Move, DragPhase::End]
        );
        assert_eq!(DragPhase::End.event_type(), event_types::DRAG_END);
    }
}
