//! Drag sessions and bounded position math.
//!
//! A drag session is scoped to one element. The session captures the
//! offset between the pointer and the element's origin at grab time;
//! every subsequent update converts the pointer position into a
//! canvas-local origin under the current zoom factor and clamps it so
//! the element stays inside the canvas. The caller applies the clamped
//! position on every update; there is no debouncing.

use serde::{Deserialize, Serialize};

use crate::{ElementId, Position, Size};

/// A point in host (screen) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in pixels.
    pub x: f32,
    /// Y coordinate in pixels.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One in-flight drag, scoped to a single element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragSession {
    /// The element being dragged.
    pub element_id: ElementId,
    /// Pointer offset within the element, captured at grab time.
    pub grab_offset: Point,
}

/// Converts pointer movement into clamped element positions.
///
/// Abandoning a session without [`DragEngine::end`] leaves the element
/// at its last applied position; no rollback is attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragEngine {
    session: Option<DragSession>,
}

impl DragEngine {
    /// Start a drag for `element_id`. `pointer` and `element_origin`
    /// are both in host coordinates; their difference is the grab
    /// offset kept for the whole session.
    pub fn begin(&mut self, element_id: ElementId, pointer: Point, element_origin: Point) {
        self.session = Some(DragSession {
            element_id,
            grab_offset: Point::new(pointer.x - element_origin.x, pointer.y - element_origin.y),
        });
    }

    /// The element of the active session, if a drag is in flight.
    #[must_use]
    pub fn active(&self) -> Option<&ElementId> {
        self.session.as_ref().map(|s| &s.element_id)
    }

    /// Compute the clamped canvas-local origin for the current pointer
    /// position. `bounds` is the element's measured rendered size, so
    /// dynamically sized content is respected. Returns `None` when no
    /// drag is in flight.
    #[must_use]
    pub fn update(
        &self,
        pointer: Point,
        container_origin: Point,
        zoom_factor: f32,
        bounds: Size,
    ) -> Option<Position> {
        let session = self.session.as_ref()?;
        let x = (pointer.x - container_origin.x - session.grab_offset.x) / zoom_factor;
        let y = (pointer.y - container_origin.y - session.grab_offset.y) / zoom_factor;
        Some(Position::new(x, y).clamped(bounds))
    }

    /// Finalize the session, returning the dragged element's id so the
    /// caller can commit an export-ready snapshot. Does not push
    /// history: the checkpoint was taken at drag start, not per
    /// intermediate position.
    pub fn end(&mut self) -> Option<ElementId> {
        self.session.take().map(|s| s.element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_session() -> DragEngine {
        let mut engine = DragEngine::default();
        // pointer grabs the element 5px right, 3px down of its corner
        engine.begin(
            ElementId::from("el"),
            Point::new(15.0, 13.0),
            Point::new(10.0, 10.0),
        );
        engine
    }

    #[test]
    fn test_update_without_session() {
        let engine = DragEngine::default();
        let pos = engine.update(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            1.0,
            Size::new(10.0, 10.0),
        );
        assert!(pos.is_none());
    }

    #[test]
    fn test_update_applies_grab_offset() {
        let engine = engine_with_session();
        let pos = engine
            .update(
                Point::new(105.0, 203.0),
                Point::new(0.0, 0.0),
                1.0,
                Size::new(50.0, 50.0),
            )
            .expect("session is active");
        assert_eq!(pos, Position::new(100.0, 200.0));
    }

    #[test]
    fn test_update_divides_by_zoom() {
        let engine = engine_with_session();
        let pos = engine
            .update(
                Point::new(205.0, 103.0),
                Point::new(0.0, 0.0),
                2.0,
                Size::new(50.0, 50.0),
            )
            .expect("session is active");
        assert_eq!(pos, Position::new(100.0, 50.0));
    }

    #[test]
    fn test_update_subtracts_container_origin() {
        let engine = engine_with_session();
        let pos = engine
            .update(
                Point::new(45.0, 33.0),
                Point::new(30.0, 20.0),
                1.0,
                Size::new(50.0, 50.0),
            )
            .expect("session is active");
        assert_eq!(pos, Position::new(10.0, 10.0));
    }

    #[test]
    fn test_update_clamps_to_canvas() {
        let engine = engine_with_session();
        let bounds = Size::new(200.0, 150.0);
        let pos = engine
            .update(
                Point::new(805.0, 803.0),
                Point::new(0.0, 0.0),
                1.0,
                bounds,
            )
            .expect("session is active");
        assert_eq!(pos, Position::new(520.0, 570.0));

        let pos = engine
            .update(
                Point::new(-100.0, -100.0),
                Point::new(0.0, 0.0),
                1.0,
                bounds,
            )
            .expect("session is active");
        assert_eq!(pos, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_end_returns_element_and_clears() {
        let mut engine = engine_with_session();
        assert_eq!(engine.active().map(ElementId::as_str), Some("el"));
        assert_eq!(engine.end().as_ref().map(ElementId::as_str), Some("el"));
        assert!(engine.active().is_none());
        assert!(engine.end().is_none());
    }
}
