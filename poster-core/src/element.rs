//! Poster elements - the records derived from the scene markup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Unique identifier for an element within a scene.
///
/// Ids are plain strings so that identifiers present in imported markup
/// can be reused verbatim. Synthesized ids combine a time-based prefix
/// with a random suffix, so two elements created within the same
/// millisecond still get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    /// Synthesize a fresh id with the given kind prefix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{prefix}-{}-{}", crate::now_ms(), &suffix[..9]))
    }

    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of content an element holds.
///
/// The kind is decided once, when a node enters the scene (import or
/// factory creation), and carried with the node from then on. Repeated
/// extraction never re-classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A text-bearing element (paragraphs, headings, spans, ...).
    Text,
    /// An image element.
    Image,
    /// A generic container (`div`).
    #[serde(rename = "div")]
    Container,
}

impl ElementKind {
    /// Classify a tag name. Used exactly once per node, at creation.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "img" => Self::Image,
            "div" => Self::Container,
            _ => Self::Text,
        }
    }

    /// Prefix used when synthesizing ids for elements of this kind.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Container => "element",
        }
    }
}

/// A top-left position in canvas-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge of the canvas.
    pub x: f32,
    /// Pixels from the top edge of the canvas.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp so an element of `size` stays fully inside the canvas.
    ///
    /// When the element is larger than the canvas the lower bound wins
    /// and the coordinate pins to 0.
    #[must_use]
    pub fn clamped(self, size: Size) -> Self {
        let max_x = (CANVAS_WIDTH - size.width).max(0.0);
        let max_y = (CANVAS_HEIGHT - size.height).max(0.0);
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
        }
    }
}

/// Measured width and height of an element in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A flat record describing one positioned element of the scene.
///
/// Records are derived from the markup tree by the extractor and are the
/// currency of the host-UI contract (tree views, property panels, the
/// clipboard). They hold no rendered-node handle; the presentation layer
/// keys its own handles by [`ElementId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Unique identifier, also serialized as the node's `id` attribute.
    pub id: ElementId,
    /// Content kind, fixed at creation time.
    pub kind: ElementKind,
    /// Tag name of the underlying node.
    pub tag: String,
    /// Concatenated descendant text. Empty for images.
    pub content: String,
    /// Top-left position parsed from inline `left`/`top` declarations.
    pub position: Position,
    /// Inline style declarations, name to value, captured verbatim.
    pub styles: BTreeMap<String, String>,
    /// Attributes excluding `style`.
    pub attributes: BTreeMap<String, String>,
}

impl ElementRecord {
    /// Serialize the record to JSON for host-UI consumption.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::PosterResult<String> {
        serde_json::to_string(self).map_err(crate::PosterError::Serialization)
    }
}
