//! Construction of new default elements.

use crate::extract::record_from_node;
use crate::node::{ElementNode, SceneNode};
use crate::scene::Scene;
use crate::{ElementId, ElementKind, ElementRecord, Position};

/// Inline placeholder shown by freshly added image elements.
pub const PLACEHOLDER_IMAGE_SRC: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"150\" viewBox=\"0 0 200 150\"%3E%3Crect width=\"200\" height=\"150\" fill=\"%23f0f0f0\"/%3E%3Ctext x=\"50%\" y=\"50%\" text-anchor=\"middle\" dy=\".3em\" fill=\"%23999\"%3EImage Placeholder%3C/text%3E%3C/svg%3E";

/// Default position for new text elements.
pub const DEFAULT_TEXT_POSITION: Position = Position::new(50.0, 50.0);

/// Default position for new image elements, offset so a fresh image
/// does not overlap a fresh text element.
pub const DEFAULT_IMAGE_POSITION: Position = Position::new(250.0, 50.0);

/// Factory for the default elements the toolbar inserts.
pub struct ElementFactory;

impl ElementFactory {
    /// Insert a default text paragraph into the scene and return its record.
    pub fn create_text(scene: &mut Scene) -> ElementRecord {
        let id = ElementId::generate(ElementKind::Text.id_prefix());
        let mut el = ElementNode::new("p");
        el.set_attribute("id", id.as_str());
        el.set_attribute(
            "style",
            "position: absolute; left: 50px; top: 50px; \
             font-size: 16px; color: #000000; font-family: Arial, sans-serif",
        );
        el.set_text_content("New Text Element");
        Self::insert(scene, el)
    }

    /// Insert a placeholder image into the scene and return its record.
    pub fn create_image(scene: &mut Scene) -> ElementRecord {
        let id = ElementId::generate(ElementKind::Image.id_prefix());
        let mut el = ElementNode::new("img");
        el.set_attribute("id", id.as_str());
        el.set_attribute("src", PLACEHOLDER_IMAGE_SRC);
        el.set_attribute("alt", "New Image");
        el.set_attribute(
            "style",
            "position: absolute; left: 250px; top: 50px; \
             width: 200px; height: 150px; object-fit: cover",
        );
        Self::insert(scene, el)
    }

    /// Rebuild a live node from a record value-copy. Used by paste: the
    /// clipboard stores properties, not a live node.
    #[must_use]
    pub fn node_from_record(record: &ElementRecord) -> ElementNode {
        let mut el = ElementNode::new(&record.tag);
        el.kind = record.kind;
        for (name, value) in &record.attributes {
            el.set_attribute(name, value);
        }
        el.set_attribute("id", record.id.as_str());
        for (name, value) in &record.styles {
            el.set_style(name, value);
        }
        el.set_style("left", &format!("{}px", record.position.x));
        el.set_style("top", &format!("{}px", record.position.y));
        if !el.is_void() {
            el.set_text_content(&record.content);
        }
        el
    }

    fn insert(scene: &mut Scene, el: ElementNode) -> ElementRecord {
        // The node carries its id, so the read back cannot fail.
        let record = record_from_node(&el).unwrap_or_else(|| {
            tracing::error!("factory node missing id attribute");
            ElementRecord {
                id: ElementId::generate(el.kind.id_prefix()),
                kind: el.kind,
                tag: el.tag.clone(),
                content: el.text_content(),
                position: Position::default(),
                styles: el.style_declarations().into_iter().collect(),
                attributes: Default::default(),
            }
        });
        scene.push_node(SceneNode::Element(el));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    #[test]
    fn test_create_text_defaults() {
        let mut scene = Scene::default();
        let record = ElementFactory::create_text(&mut scene);

        assert_eq!(record.kind, ElementKind::Text);
        assert_eq!(record.content, "New Text Element");
        assert_eq!(record.position, DEFAULT_TEXT_POSITION);
        assert_eq!(record.styles.get("font-size").map(String::as_str), Some("16px"));
        assert_eq!(record.styles.get("color").map(String::as_str), Some("#000000"));
        assert_eq!(scene.element_count(), 1);
    }

    #[test]
    fn test_create_image_defaults() {
        let mut scene = Scene::default();
        let record = ElementFactory::create_image(&mut scene);

        assert_eq!(record.kind, ElementKind::Image);
        assert_eq!(record.content, "");
        assert_eq!(record.position, DEFAULT_IMAGE_POSITION);
        assert_eq!(record.attributes.get("alt").map(String::as_str), Some("New Image"));
        assert_eq!(record.styles.get("width").map(String::as_str), Some("200px"));
        assert_eq!(record.styles.get("height").map(String::as_str), Some("150px"));
    }

    #[test]
    fn test_defaults_do_not_overlap() {
        // a fresh image starts to the right of a fresh text element
        assert!(DEFAULT_IMAGE_POSITION.x >= DEFAULT_TEXT_POSITION.x + 150.0);
    }

    #[test]
    fn test_node_from_record_round_trip() {
        let mut scene = Scene::default();
        let record = ElementFactory::create_image(&mut scene);

        let rebuilt = ElementFactory::node_from_record(&record);
        let rebuilt_record = record_from_node(&rebuilt).expect("rebuilt node keeps its id");
        assert_eq!(rebuilt_record, record);
    }
}
