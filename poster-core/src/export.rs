//! Standalone document export.
//!
//! Serializes the scene into a complete, self-contained HTML document:
//! selection markers are stripped, the content is wrapped in the fixed
//! 720x720 poster container and a minimal style block is emitted.
//! Triggering the actual download is the host's side effect; the core
//! only produces the document descriptor.

use crate::node::{nodes_to_markup, SceneNode};
use crate::render::SELECTION_MARKER_CLASS;
use crate::scene::Scene;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Default filename offered for the downloaded document.
pub const DEFAULT_EXPORT_FILENAME: &str = "poster.html";

/// MIME type of exported documents.
pub const EXPORT_MIME: &str = "text/html";

/// A ready-to-download standalone document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// The complete document markup.
    pub content: String,
    /// Suggested filename.
    pub filename: String,
    /// MIME type for the download.
    pub mime: &'static str,
}

/// Build the standalone export document for a scene.
#[must_use]
pub fn export_document(scene: &Scene) -> ExportedDocument {
    let mut roots = scene.roots().to_vec();
    strip_selection_markers(&mut roots);
    let content = nodes_to_markup(&roots);

    let width = CANVAS_WIDTH;
    let height = CANVAS_HEIGHT;
    let exported_at = crate::now_ms();
    let document = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <meta data-generated-by=\"poster-core\" />\n\
         <meta data-exported-at=\"{exported_at}\" />\n\
         <title>Editable HTML Poster</title>\n\
         <style>\n\
         body {{ margin: 0; padding: 0; font-family: sans-serif; }}\n\
         .poster-container {{ width: {width}px; height: {height}px; position: relative; \
          overflow: hidden; margin: 0 auto; background: #f3f4f6; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <div class=\"poster-container\">\n\
         {content}\n\
         </div>\n\
         </body>\n\
         </html>\n"
    );

    tracing::info!(bytes = document.len(), "export document generated");
    ExportedDocument {
        content: document,
        filename: DEFAULT_EXPORT_FILENAME.to_owned(),
        mime: EXPORT_MIME,
    }
}

/// Remove the transient selection marker class from every element;
/// drop `class` attributes left empty by the removal.
fn strip_selection_markers(nodes: &mut [SceneNode]) {
    for node in nodes {
        if let SceneNode::Element(el) = node {
            if let Some(class) = el.attribute("class") {
                let kept: Vec<&str> = class
                    .split_whitespace()
                    .filter(|token| *token != SELECTION_MARKER_CLASS)
                    .collect();
                if kept.is_empty() {
                    el.remove_attribute("class");
                } else {
                    let kept = kept.join(" ");
                    el.set_attribute("class", &kept);
                }
            }
            strip_selection_markers(&mut el.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_from(markup: &str) -> Scene {
        let mut scene = Scene::new();
        scene.restore(markup);
        scene
    }

    #[test]
    fn test_export_wraps_in_poster_container() {
        let scene = scene_from("<h1 id=\"t\" style=\"left: 40px; top: 80px\">Summer Sale</h1>");
        let doc = export_document(&scene);

        assert!(doc.content.starts_with("<!DOCTYPE html>"));
        assert!(doc.content.contains("class=\"poster-container\""));
        assert!(doc.content.contains("width: 720px; height: 720px"));
        assert!(doc.content.contains("Summer Sale"));
        assert_eq!(doc.filename, "poster.html");
        assert_eq!(doc.mime, "text/html");
    }

    #[test]
    fn test_export_strips_selection_marker() {
        let scene = scene_from(
            "<p id=\"a\" class=\"title element-selected\">Hi</p>\
             <p id=\"b\" class=\"element-selected\">Yo</p>",
        );
        let doc = export_document(&scene);

        assert!(!doc.content.contains(SELECTION_MARKER_CLASS));
        assert!(doc.content.contains("class=\"title\""));
        // the attribute disappears entirely when only the marker was left
        assert!(doc.content.contains("<p id=\"b\">Yo</p>"));
    }

    #[test]
    fn test_export_leaves_scene_untouched() {
        let scene = scene_from("<p id=\"a\" class=\"element-selected\">Hi</p>");
        let before = scene.to_markup();
        let _ = export_document(&scene);
        assert_eq!(scene.to_markup(), before);
    }

    #[test]
    fn test_export_carries_generator_meta() {
        let doc = export_document(&scene_from("<p>x</p>"));
        assert!(doc.content.contains("data-generated-by=\"poster-core\""));
        assert!(doc.content.contains("data-exported-at="));
    }
}
