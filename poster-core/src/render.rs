//! The rendered-node adapter boundary.
//!
//! The core never holds a concrete rendering-technology object. The
//! presentation layer owns the live nodes and exposes them through
//! [`RenderAdapter`], keyed by element id. [`HeadlessRenderer`] is the
//! in-process implementation used by tests and non-visual hosts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::drag::Point;
use crate::node::ElementNode;
use crate::{extract, ElementId, ElementKind, Position, Size};

/// Class token the presentation layer uses to mark the selected
/// element. The exporter strips it from outgoing markup.
pub const SELECTION_MARKER_CLASS: &str = "element-selected";

/// Visual configuration for the selection marker.
///
/// Passed to the adapter at construction instead of being injected as
/// process-wide style state, so two editors can highlight differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTheme {
    /// Outline color of the selected element.
    pub outline_color: String,
    /// Outline width in pixels.
    pub outline_width: f32,
    /// Class token applied to the selected element.
    pub marker_class: String,
}

impl Default for SelectionTheme {
    fn default() -> Self {
        Self {
            outline_color: "#3b82f6".to_owned(),
            outline_width: 2.0,
            marker_class: SELECTION_MARKER_CLASS.to_owned(),
        }
    }
}

/// What the core asks of the presentation layer, per element.
pub trait RenderAdapter {
    /// Origin of the canvas surface in host coordinates, or `None`
    /// while the surface is not mounted yet.
    fn container_origin(&self) -> Option<Point>;

    /// Move the rendered node for `id` to `position`.
    fn set_position(&mut self, id: &ElementId, position: Position);

    /// Apply one style declaration to the rendered node for `id`.
    fn set_style(&mut self, id: &ElementId, name: &str, value: &str);

    /// Replace the text content of the rendered node for `id`.
    fn set_content(&mut self, id: &ElementId, content: &str);

    /// Remove the rendered node for `id`.
    fn remove(&mut self, id: &ElementId);

    /// Measure the live rendered bounds of the node for `id`, or `None`
    /// when the implementation cannot measure (the caller then falls
    /// back to declared sizes).
    fn measure_bounds(&self, id: &ElementId) -> Option<Size>;
}

/// Fallback bounds when neither the adapter nor the node's declared
/// sizes give a measurement.
#[must_use]
pub fn default_bounds(kind: ElementKind) -> Size {
    match kind {
        ElementKind::Text => Size::new(120.0, 24.0),
        ElementKind::Image => Size::new(200.0, 150.0),
        ElementKind::Container => Size::new(100.0, 100.0),
    }
}

/// Resolve an element's bounds from its declared `width`/`height`
/// styles or attributes, falling back to [`default_bounds`].
#[must_use]
pub fn declared_bounds(el: &ElementNode) -> Size {
    let defaults = default_bounds(el.kind);
    let width = el
        .style_value("width")
        .map(|v| extract::parse_px(&v))
        .or_else(|| el.attribute("width").map(extract::parse_px))
        .filter(|v| *v > 0.0)
        .unwrap_or(defaults.width);
    let height = el
        .style_value("height")
        .map(|v| extract::parse_px(&v))
        .or_else(|| el.attribute("height").map(extract::parse_px))
        .filter(|v| *v > 0.0)
        .unwrap_or(defaults.height);
    Size::new(width, height)
}

/// Adapter for headless operation: tracks applied state in maps and
/// reports measurements seeded by the host or by tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    theme: SelectionTheme,
    origin: Point,
    mounted: bool,
    bounds: HashMap<ElementId, Size>,
    positions: HashMap<ElementId, Position>,
}

impl HeadlessRenderer {
    /// Create a mounted headless surface at origin (0, 0).
    #[must_use]
    pub fn new(theme: SelectionTheme) -> Self {
        Self {
            theme,
            mounted: true,
            ..Self::default()
        }
    }

    /// The selection theme this adapter was constructed with.
    #[must_use]
    pub fn theme(&self) -> &SelectionTheme {
        &self.theme
    }

    /// Mount or unmount the surface.
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Move the surface origin in host coordinates.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Seed a measurement for an element, as a layout pass would.
    pub fn set_bounds(&mut self, id: ElementId, size: Size) {
        self.bounds.insert(id, size);
    }

    /// The last position applied through the adapter, if any.
    #[must_use]
    pub fn applied_position(&self, id: &ElementId) -> Option<Position> {
        self.positions.get(id).copied()
    }
}

impl RenderAdapter for HeadlessRenderer {
    fn container_origin(&self) -> Option<Point> {
        self.mounted.then_some(self.origin)
    }

    fn set_position(&mut self, id: &ElementId, position: Position) {
        self.positions.insert(id.clone(), position);
    }

    fn set_style(&mut self, _id: &ElementId, _name: &str, _value: &str) {}

    fn set_content(&mut self, _id: &ElementId, _content: &str) {}

    fn remove(&mut self, id: &ElementId) {
        self.bounds.remove(id);
        self.positions.remove(id);
    }

    fn measure_bounds(&self, id: &ElementId) -> Option<Size> {
        self.bounds.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SceneNode;

    #[test]
    fn test_declared_bounds_from_styles() {
        let mut el = ElementNode::new("img");
        el.set_attribute("style", "width: 300px; height: 120px");
        assert_eq!(declared_bounds(&el), Size::new(300.0, 120.0));
    }

    #[test]
    fn test_declared_bounds_from_attributes() {
        let mut el = ElementNode::new("img");
        el.set_attribute("width", "64");
        el.set_attribute("height", "32");
        assert_eq!(declared_bounds(&el), Size::new(64.0, 32.0));
    }

    #[test]
    fn test_declared_bounds_fallback_by_kind() {
        let mut p = ElementNode::new("p");
        p.children.push(SceneNode::Text("hi".to_owned()));
        assert_eq!(declared_bounds(&p), default_bounds(ElementKind::Text));

        let img = ElementNode::new("img");
        assert_eq!(declared_bounds(&img), default_bounds(ElementKind::Image));
    }

    #[test]
    fn test_headless_mounting() {
        let mut renderer = HeadlessRenderer::new(SelectionTheme::default());
        assert!(renderer.container_origin().is_some());

        renderer.set_mounted(false);
        assert!(renderer.container_origin().is_none());
    }

    #[test]
    fn test_headless_measure_and_apply() {
        let mut renderer = HeadlessRenderer::new(SelectionTheme::default());
        let id = ElementId::from("a");
        assert!(renderer.measure_bounds(&id).is_none());

        renderer.set_bounds(id.clone(), Size::new(10.0, 20.0));
        assert_eq!(renderer.measure_bounds(&id), Some(Size::new(10.0, 20.0)));

        renderer.set_position(&id, Position::new(5.0, 6.0));
        assert_eq!(renderer.applied_position(&id), Some(Position::new(5.0, 6.0)));

        renderer.remove(&id);
        assert!(renderer.measure_bounds(&id).is_none());
        assert!(renderer.applied_position(&id).is_none());
    }
}
