//! The owned markup tree that backs a scene.
//!
//! Nodes are plain data: tag, attributes, children. The inline `style`
//! attribute is stored verbatim and parsed on demand, so declaration
//! values survive round trips untouched.

use serde::{Deserialize, Serialize};

use crate::ElementKind;

/// One node of the scene tree: either an element or a text run.
///
/// Externally tagged in JSON (`{"element": {...}}` / `{"text": "..."}`);
/// an internal tag cannot carry the bare text string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneNode {
    /// An element with a tag, attributes and children.
    Element(ElementNode),
    /// A run of character data.
    Text(String),
}

/// An element node of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Lowercase tag name.
    pub tag: String,
    /// Content kind, fixed when the node entered the scene.
    pub kind: ElementKind,
    /// Attributes in source order, including `style` verbatim.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<SceneNode>,
}

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["img", "br"];

impl ElementNode {
    /// Create an element node with no attributes or children.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            kind: ElementKind::from_tag(tag),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_owned();
        } else {
            self.attributes.push((name.to_owned(), value.to_owned()));
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Parse the inline style attribute into `(name, value)` pairs,
    /// preserving declaration order.
    #[must_use]
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        let Some(style) = self.attribute("style") else {
            return Vec::new();
        };
        style
            .split(';')
            .filter_map(|rule| {
                let (name, value) = rule.split_once(':')?;
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    return None;
                }
                Some((name.to_owned(), value.to_owned()))
            })
            .collect()
    }

    /// Look up one inline style declaration value.
    #[must_use]
    pub fn style_value(&self, name: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Set one inline style declaration, rewriting the `style` attribute
    /// and keeping the order of the other declarations.
    pub fn set_style(&mut self, name: &str, value: &str) {
        let mut declarations = self.style_declarations();
        if let Some(slot) = declarations.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_owned();
        } else {
            declarations.push((name.to_owned(), value.to_owned()));
        }
        self.write_style(&declarations);
    }

    /// Remove one inline style declaration.
    pub fn remove_style(&mut self, name: &str) {
        let declarations: Vec<_> = self
            .style_declarations()
            .into_iter()
            .filter(|(n, _)| n != name)
            .collect();
        if declarations.is_empty() {
            self.remove_attribute("style");
        } else {
            self.write_style(&declarations);
        }
    }

    fn write_style(&mut self, declarations: &[(String, String)]) {
        let style = declarations
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute("style", &style);
    }

    /// Concatenated text of all descendant text runs.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Replace all children with a single text run.
    pub fn set_text_content(&mut self, content: &str) {
        self.children = vec![SceneNode::Text(content.to_owned())];
    }

    /// Whether this tag is serialized without a closing tag.
    #[must_use]
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    /// Serialize this element (and its subtree) to markup.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn collect_text(children: &[SceneNode], out: &mut String) {
    for child in children {
        match child {
            SceneNode::Text(text) => out.push_str(text),
            SceneNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Serialize a node list to markup.
#[must_use]
pub fn nodes_to_markup(nodes: &[SceneNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &SceneNode, out: &mut String) {
    match node {
        SceneNode::Text(text) => out.push_str(&escape_text(text)),
        SceneNode::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &ElementNode, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    if el.is_void() {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Find an element node by its `id` attribute, depth-first.
#[must_use]
pub fn find_by_id<'a>(nodes: &'a [SceneNode], id: &str) -> Option<&'a ElementNode> {
    for node in nodes {
        if let SceneNode::Element(el) = node {
            if el.attribute("id") == Some(id) {
                return Some(el);
            }
            if let Some(found) = find_by_id(&el.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<'a>(nodes: &'a mut [SceneNode], id: &str) -> Option<&'a mut ElementNode> {
    for node in nodes {
        if let SceneNode::Element(el) = node {
            if el.attribute("id") == Some(id) {
                return Some(el);
            }
            if let Some(found) = find_by_id_mut(&mut el.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Detach the element with the given id from the tree, returning it.
pub fn remove_by_id(nodes: &mut Vec<SceneNode>, id: &str) -> Option<ElementNode> {
    let mut index = 0;
    while index < nodes.len() {
        let matches_id = match &nodes[index] {
            SceneNode::Element(el) => el.attribute("id") == Some(id),
            SceneNode::Text(_) => false,
        };
        if matches_id {
            if let SceneNode::Element(removed) = nodes.remove(index) {
                return Some(removed);
            }
            return None;
        }
        if let SceneNode::Element(el) = &mut nodes[index] {
            if let Some(removed) = remove_by_id(&mut el.children, id) {
                return Some(removed);
            }
        }
        index += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph() -> ElementNode {
        let mut el = ElementNode::new("p");
        el.set_attribute("id", "p1");
        el.set_attribute("style", "left: 10px; top: 20px; color: #111827");
        el.children.push(SceneNode::Text("Hello".to_owned()));
        el
    }

    #[test]
    fn test_style_round_trip() {
        let mut el = paragraph();
        assert_eq!(el.style_value("left").as_deref(), Some("10px"));

        el.set_style("left", "42px");
        el.set_style("font-size", "16px");
        assert_eq!(el.style_value("left").as_deref(), Some("42px"));
        assert_eq!(el.style_value("font-size").as_deref(), Some("16px"));
        // untouched declarations keep their verbatim values
        assert_eq!(el.style_value("color").as_deref(), Some("#111827"));

        el.remove_style("color");
        assert_eq!(el.style_value("color"), None);
    }

    #[test]
    fn test_serialize_nested() {
        let mut outer = ElementNode::new("p");
        outer.children.push(SceneNode::Text("Up to ".to_owned()));
        let mut strong = ElementNode::new("strong");
        strong.children.push(SceneNode::Text("50% off".to_owned()));
        outer.children.push(SceneNode::Element(strong));

        assert_eq!(outer.to_markup(), "<p>Up to <strong>50% off</strong></p>");
        assert_eq!(outer.text_content(), "Up to 50% off");
    }

    #[test]
    fn test_serialize_void_and_escaping() {
        let mut img = ElementNode::new("img");
        img.set_attribute("src", "a.png?x=1&y=2");
        img.set_attribute("alt", "say \"hi\"");
        assert_eq!(
            img.to_markup(),
            "<img src=\"a.png?x=1&amp;y=2\" alt=\"say &quot;hi&quot;\" />"
        );

        let mut p = ElementNode::new("p");
        p.children.push(SceneNode::Text("1 < 2 & 3 > 2".to_owned()));
        assert_eq!(p.to_markup(), "<p>1 &lt; 2 &amp; 3 &gt; 2</p>");
    }

    #[test]
    fn test_find_and_remove_by_id() {
        let mut div = ElementNode::new("div");
        div.set_attribute("id", "wrap");
        div.children.push(SceneNode::Element(paragraph()));
        let mut nodes = vec![SceneNode::Element(div)];

        assert!(find_by_id(&nodes, "p1").is_some());
        assert!(find_by_id(&nodes, "nope").is_none());

        find_by_id_mut(&mut nodes, "p1")
            .expect("should find nested node")
            .set_style("top", "99px");

        let removed = remove_by_id(&mut nodes, "p1").expect("should remove nested node");
        assert_eq!(removed.tag, "p");
        assert!(find_by_id(&nodes, "p1").is_none());
    }
}
