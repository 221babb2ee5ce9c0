//! Element-record extraction.
//!
//! Walks the scene tree in document (depth-first, pre-order) order and
//! derives one [`ElementRecord`] per element node. Extraction is
//! idempotent: a node without an `id` attribute gets a fresh id written
//! back onto it, so re-running extraction on an unchanged tree yields
//! identical ids, positions and properties.

use std::collections::{BTreeMap, HashSet};

use crate::node::{ElementNode, SceneNode};
use crate::{ElementId, ElementRecord, Position};

/// Derive the ordered element records for a scene tree.
///
/// Synthesized ids are written back onto the nodes, and duplicated ids
/// in imported markup are replaced so that ids stay unique across the
/// live scene.
pub fn extract_records(nodes: &mut [SceneNode]) -> Vec<ElementRecord> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for node in nodes.iter_mut() {
        if let SceneNode::Element(el) = node {
            visit(el, &mut records, &mut seen);
        }
    }
    records
}

fn visit(el: &mut ElementNode, records: &mut Vec<ElementRecord>, seen: &mut HashSet<String>) {
    let id = assign_id(el, seen);
    records.push(build_record(el, id));
    for child in &mut el.children {
        if let SceneNode::Element(child_el) = child {
            visit(child_el, records, seen);
        }
    }
}

/// Reuse the node's identifier attribute when present and still unique;
/// otherwise synthesize one and write it back.
fn assign_id(el: &mut ElementNode, seen: &mut HashSet<String>) -> ElementId {
    let existing = el
        .attribute("id")
        .filter(|v| !v.is_empty() && !seen.contains(*v))
        .map(ElementId::from);
    let id = existing.unwrap_or_else(|| {
        let fresh = ElementId::generate(el.kind.id_prefix());
        el.set_attribute("id", fresh.as_str());
        fresh
    });
    seen.insert(id.as_str().to_owned());
    id
}

/// Build the record for a single node without touching it. Returns
/// `None` when the node has no id yet (i.e. was never extracted).
#[must_use]
pub fn record_from_node(el: &ElementNode) -> Option<ElementRecord> {
    let id = el.attribute("id").filter(|v| !v.is_empty())?;
    Some(build_record(el, ElementId::from(id)))
}

fn build_record(el: &ElementNode, id: ElementId) -> ElementRecord {
    let styles: BTreeMap<String, String> = el.style_declarations().into_iter().collect();
    let attributes: BTreeMap<String, String> = el
        .attributes
        .iter()
        .filter(|(name, _)| name != "style")
        .cloned()
        .collect();
    ElementRecord {
        id,
        kind: el.kind,
        tag: el.tag.clone(),
        content: el.text_content(),
        position: Position::new(
            styles.get("left").map_or(0.0, |v| parse_px(v)),
            styles.get("top").map_or(0.0, |v| parse_px(v)),
        ),
        styles,
        attributes,
    }
}

/// Parse the leading numeric part of a declaration value such as
/// `"50px"`. Absent or non-numeric values default to 0.
#[must_use]
pub fn parse_px(value: &str) -> f32 {
    let trimmed = value.trim();
    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();
    numeric.parse().unwrap_or(0.0)
}
