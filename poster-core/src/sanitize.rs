//! Markup sanitization.
//!
//! Untrusted markup is parsed with html5ever and rebuilt as a
//! [`SceneNode`] tree, keeping only whitelisted tags and attributes.
//! A disallowed tag is stripped while its permitted descendants are
//! re-parented in its place; a disallowed attribute is dropped and the
//! element kept. Sanitization never fails: malformed input degrades to
//! the best-effort cleaned subset, worst case an empty string.
//!
//! Whitespace-only text runs are dropped during conversion. Elements
//! are positioned absolutely on the canvas, so inter-element whitespace
//! never affects layout and snapshots stay free of formatting noise.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::node::{nodes_to_markup, ElementNode, SceneNode};
use crate::ElementKind;

/// Tags allowed to survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "img", "span", "strong", "em", "br",
];

/// Attributes allowed to survive sanitization.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["class", "style", "src", "alt", "width", "height", "id"];

/// Tags whose entire subtree is dropped, text included. Everything
/// executable or document-level lands here.
const DROP_CONTENT_TAGS: &[&str] = &[
    "script", "style", "iframe", "frame", "object", "embed", "template", "title", "noscript",
];

/// Whether a tag survives sanitization.
#[must_use]
pub fn is_allowed_tag(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag)
}

/// Whether an attribute survives sanitization.
#[must_use]
pub fn is_allowed_attribute(name: &str) -> bool {
    ALLOWED_ATTRIBUTES.contains(&name)
}

/// Sanitize raw markup to the whitelisted subset.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    nodes_to_markup(&parse_markup(raw))
}

/// Parse raw markup into a sanitized scene tree.
///
/// The html5ever parser is error-tolerant by construction, so any input
/// produces a tree; the whitelist is applied while converting the
/// parsed DOM into scene nodes.
#[must_use]
pub fn parse_markup(raw: &str) -> Vec<SceneNode> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(raw);
    let mut out = Vec::new();
    if let Some(body) = find_body(&dom.document) {
        for child in body.children.borrow().iter() {
            convert(child, &mut out);
        }
    }
    out
}

/// Locate the `<body>` element the parser synthesizes for any input.
fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if name.local.as_ref() == "body" {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(body) = find_body(child) {
            return Some(body);
        }
    }
    None
}

/// Convert one parsed node, appending the sanitized result to `out`.
fn convert(handle: &Handle, out: &mut Vec<SceneNode>) {
    match handle.data {
        NodeData::Text { ref contents } => {
            let text = contents.borrow().to_string();
            if !text.trim().is_empty() {
                out.push(SceneNode::Text(text));
            }
        }
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.as_ref().to_ascii_lowercase();
            if DROP_CONTENT_TAGS.contains(&tag.as_str()) {
                tracing::debug!(tag = %tag, "dropping tag with content");
                return;
            }
            if !is_allowed_tag(&tag) {
                // Strip the element but keep its permitted descendants.
                tracing::debug!(tag = %tag, "stripping disallowed tag");
                for child in handle.children.borrow().iter() {
                    convert(child, out);
                }
                return;
            }

            let mut el = ElementNode {
                tag: tag.clone(),
                kind: ElementKind::from_tag(&tag),
                attributes: Vec::new(),
                children: Vec::new(),
            };
            for attr in attrs.borrow().iter() {
                let attr_name = attr.name.local.as_ref().to_ascii_lowercase();
                if is_allowed_attribute(&attr_name) {
                    el.attributes.push((attr_name, attr.value.to_string()));
                }
            }
            for child in handle.children.borrow().iter() {
                convert(child, &mut el.children);
            }
            out.push(SceneNode::Element(el));
        }
        // Comments, doctypes and processing instructions never survive.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::find_by_id;

    #[test]
    fn test_allowed_markup_passes_through() {
        let clean = sanitize("<p style=\"left: 10px; top: 10px\">Hi</p>");
        assert_eq!(clean, "<p style=\"left: 10px; top: 10px\">Hi</p>");
    }

    #[test]
    fn test_script_is_dropped_with_content() {
        let clean = sanitize("<p>ok</p><script>alert('x')</script>");
        assert_eq!(clean, "<p>ok</p>");
    }

    #[test]
    fn test_disallowed_tag_keeps_descendants() {
        let clean = sanitize("<section><p>kept</p></section>");
        assert_eq!(clean, "<p>kept</p>");

        let clean = sanitize("<a href=\"x\"><strong>label</strong></a>");
        assert_eq!(clean, "<strong>label</strong>");
    }

    #[test]
    fn test_disallowed_attribute_dropped_element_kept() {
        let clean = sanitize("<p onclick=\"evil()\" id=\"a\" style=\"color: red\">hi</p>");
        assert_eq!(clean, "<p id=\"a\" style=\"color: red\">hi</p>");
    }

    #[test]
    fn test_inter_element_whitespace_normalized() {
        let clean = sanitize("<p>a</p> <p>b</p>\n<p>c</p>");
        assert_eq!(clean, "<p>a</p><p>b</p><p>c</p>");
        // whitespace inside a text run survives
        assert_eq!(sanitize("<p>a b</p>"), "<p>a b</p>");
    }

    #[test]
    fn test_iframe_never_survives() {
        let clean = sanitize("<iframe src=\"https://x\"></iframe><h1>t</h1>");
        assert_eq!(clean, "<h1>t</h1>");
    }

    #[test]
    fn test_malformed_input_degrades() {
        assert_eq!(sanitize(""), "");
        // angle-bracket soup yields at most escaped text, never elements
        let nodes = parse_markup("<<<>>>");
        assert!(!nodes.iter().any(|n| matches!(n, SceneNode::Element(_))));
        // unclosed tags are repaired, not rejected
        let clean = sanitize("<p>open<div>nested");
        assert!(clean.contains("open"));
        assert!(clean.contains("nested"));
    }

    #[test]
    fn test_full_document_reduces_to_body_content() {
        let doc = "<!DOCTYPE html><html><head><title>t</title>\
                   <style>.x{color:red}</style></head>\
                   <body><div id=\"poster\"><h1 class=\"title\">Hello</h1></div></body></html>";
        let nodes = parse_markup(doc);
        assert_eq!(nodes.len(), 1);
        assert!(find_by_id(&nodes, "poster").is_some());
        assert!(!nodes_to_markup(&nodes).contains("title>"));
    }

    #[test]
    fn test_container_kind_assigned_at_parse() {
        let nodes = parse_markup("<div id=\"c\"><p id=\"t\">x</p></div>");
        let container = find_by_id(&nodes, "c").expect("container should parse");
        assert_eq!(container.kind, ElementKind::Container);
        let text = find_by_id(&nodes, "t").expect("paragraph should parse");
        assert_eq!(text.kind, ElementKind::Text);
    }
}
