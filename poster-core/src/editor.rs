//! The editor facade: the command surface the host UI talks to.
//!
//! Every mutating command checkpoints the pre-action scene snapshot
//! before touching state, and validates its inputs before the
//! checkpoint, so a failed command leaves scene, history, selection and
//! clipboard exactly as they were.

use crate::clipboard::{Clipboard, Selection};
use crate::drag::{DragEngine, Point};
use crate::extract::{parse_px, record_from_node};
use crate::factory::ElementFactory;
use crate::history::HistoryStore;
use crate::node::{ElementNode, SceneNode};
use crate::render::{declared_bounds, HeadlessRenderer, RenderAdapter, SelectionTheme};
use crate::scene::{Scene, Zoom};
use crate::{
    export, sanitize, ElementId, ElementKind, ElementRecord, Position, PosterError, PosterResult,
    Size,
};

/// Sample poster document, handy for demos and tests.
pub const SAMPLE_POSTER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>Sample Poster</title>
</head>
<body>
<div class="poster">
<h1 class="title" style="position: absolute; top: 80px; left: 40px; font-size: 48px; font-weight: bold; color: #111827">Summer Sale</h1>
<p class="subtitle" style="position: absolute; top: 160px; left: 40px; font-size: 20px; color: #374151">Up to <strong>50% off</strong> on select items!</p>
<img class="hero" src="https://example.com/hero.jpg" alt="Model" style="position: absolute; top: 340px; left: 340px; width: 380px; height: 380px; object-fit: cover" />
</div>
</body>
</html>"#;

/// Inline text editing state.
///
/// Editing never touches the scene until commit: the draft lives here,
/// and cancel simply drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// No inline edit in progress.
    Idle,
    /// An inline edit is in progress.
    Editing {
        /// The element being edited.
        id: ElementId,
        /// The uncommitted text.
        draft: String,
    },
}

/// The poster editor: scene, history, selection, clipboard and drag
/// engine behind one command surface.
#[derive(Debug)]
pub struct PosterEditor<R: RenderAdapter = HeadlessRenderer> {
    scene: Scene,
    history: HistoryStore,
    selection: Selection,
    clipboard: Clipboard,
    drag: DragEngine,
    edit_mode: EditMode,
    adapter: R,
}

impl PosterEditor<HeadlessRenderer> {
    /// Create an editor backed by the headless adapter.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(HeadlessRenderer::new(SelectionTheme::default()))
    }
}

impl<R: RenderAdapter> PosterEditor<R> {
    /// Create an editor over an empty scene.
    #[must_use]
    pub fn new(adapter: R) -> Self {
        Self {
            scene: Scene::new(),
            history: HistoryStore::new(),
            selection: Selection::default(),
            clipboard: Clipboard::default(),
            drag: DragEngine::default(),
            edit_mode: EditMode::Idle,
            adapter,
        }
    }

    /// The rendering adapter.
    pub fn adapter(&self) -> &R {
        &self.adapter
    }

    /// The rendering adapter, mutably (e.g. to mount the surface).
    pub fn adapter_mut(&mut self) -> &mut R {
        &mut self.adapter
    }

    /// The ordered element records of the current scene.
    pub fn elements(&mut self) -> Vec<ElementRecord> {
        self.scene.extract()
    }

    /// The current scene markup, with ids assigned to every element.
    pub fn snapshot(&mut self) -> String {
        self.scene.extract();
        self.scene.to_markup()
    }

    /// Current view zoom.
    #[must_use]
    pub fn zoom(&self) -> Zoom {
        self.scene.zoom
    }

    /// Step the view zoom in by 25%, up to 200%.
    pub fn zoom_in(&mut self) {
        self.scene.zoom = self.scene.zoom.zoom_in();
    }

    /// Step the view zoom out by 25%, down to 50%.
    pub fn zoom_out(&mut self) {
        self.scene.zoom = self.scene.zoom.zoom_out();
    }

    /// Reset the view zoom to 100%.
    pub fn zoom_reset(&mut self) {
        self.scene.zoom = self.scene.zoom.reset();
    }

    // ---- selection ----------------------------------------------------

    /// Replace the selection. `None` clears it. The adapter is expected
    /// to move its visual marker when the host re-reads the selection.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] when selecting an id
    /// that is not in the scene.
    pub fn select(&mut self, id: Option<ElementId>) -> PosterResult<()> {
        if let Some(id) = &id {
            if self.scene.find(id.as_str()).is_none() {
                return Err(PosterError::ElementNotFound(id.to_string()));
            }
        }
        tracing::debug!(selected = ?id.as_ref().map(ElementId::as_str), "selection changed");
        self.selection.select(id);
        Ok(())
    }

    /// The record of the selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementRecord> {
        let id = self.selection.current()?;
        record_from_node(self.scene.find(id.as_str())?)
    }

    /// The selected element id, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selection.current()
    }

    // ---- element creation and removal ---------------------------------

    /// Add a default text element and select it.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::MissingContainer`] before the canvas
    /// surface is mounted.
    pub fn add_text(&mut self) -> PosterResult<ElementRecord> {
        self.require_container()?;
        self.checkpoint();
        let record = ElementFactory::create_text(&mut self.scene);
        tracing::debug!(id = %record.id, "text element added");
        self.selection.select(Some(record.id.clone()));
        Ok(record)
    }

    /// Add a placeholder image element and select it.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::MissingContainer`] before the canvas
    /// surface is mounted.
    pub fn add_image(&mut self) -> PosterResult<ElementRecord> {
        self.require_container()?;
        self.checkpoint();
        let record = ElementFactory::create_image(&mut self.scene);
        tracing::debug!(id = %record.id, "image element added");
        self.selection.select(Some(record.id.clone()));
        Ok(record)
    }

    /// Delete the selected element and clear the selection.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::NoSelection`] with nothing selected, or
    /// [`PosterError::ElementNotFound`] for a stale selection.
    pub fn delete(&mut self) -> PosterResult<()> {
        let id = self
            .selection
            .current()
            .cloned()
            .ok_or(PosterError::NoSelection)?;
        if self.scene.find(id.as_str()).is_none() {
            return Err(PosterError::ElementNotFound(id.to_string()));
        }
        self.checkpoint();
        self.scene.remove(id.as_str())?;
        self.adapter.remove(&id);
        self.selection.clear();
        tracing::debug!(id = %id, "element deleted");
        Ok(())
    }

    // ---- property edits -----------------------------------------------

    /// Replace the text content of an element.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] for an unknown id and
    /// [`PosterError::InvalidOperation`] for image elements.
    pub fn set_content(&mut self, id: &ElementId, content: &str) -> PosterResult<()> {
        let el = self.find_element(id)?;
        if el.kind == ElementKind::Image {
            return Err(PosterError::InvalidOperation(
                "image elements have no text content".to_owned(),
            ));
        }
        self.checkpoint();
        if let Some(el) = self.scene.find_mut(id.as_str()) {
            el.set_text_content(content);
        }
        self.adapter.set_content(id, content);
        Ok(())
    }

    /// Set one inline style declaration on an element.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] for an unknown id.
    pub fn set_style(&mut self, id: &ElementId, name: &str, value: &str) -> PosterResult<()> {
        self.find_element(id)?;
        self.checkpoint();
        if let Some(el) = self.scene.find_mut(id.as_str()) {
            el.set_style(name, value);
        }
        self.adapter.set_style(id, name, value);
        Ok(())
    }

    /// Set an attribute on an element (e.g. an image `src` or `alt`).
    /// Only whitelisted attributes are accepted, so the scene always
    /// stays within the sanitized subset.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] for an unknown id and
    /// [`PosterError::InvalidOperation`] for a non-whitelisted
    /// attribute.
    pub fn set_attribute(&mut self, id: &ElementId, name: &str, value: &str) -> PosterResult<()> {
        if !sanitize::is_allowed_attribute(name) {
            return Err(PosterError::InvalidOperation(format!(
                "attribute not allowed: {name}"
            )));
        }
        self.find_element(id)?;
        self.checkpoint();
        if let Some(el) = self.scene.find_mut(id.as_str()) {
            el.set_attribute(name, value);
        }
        Ok(())
    }

    /// Flip an element between hidden (`display: none`) and shown.
    /// Returns `true` when the element is hidden afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] for an unknown id.
    pub fn toggle_visibility(&mut self, id: &ElementId) -> PosterResult<bool> {
        let hidden = self
            .find_element(id)?
            .style_value("display")
            .is_some_and(|v| v == "none");
        self.checkpoint();
        if let Some(el) = self.scene.find_mut(id.as_str()) {
            if hidden {
                el.remove_style("display");
            } else {
                el.set_style("display", "none");
            }
        }
        self.adapter
            .set_style(id, "display", if hidden { "" } else { "none" });
        Ok(!hidden)
    }

    // ---- movement -----------------------------------------------------

    /// Move the selected element by a delta, clamped to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::NoSelection`] with nothing selected.
    pub fn move_by(&mut self, dx: f32, dy: f32) -> PosterResult<Position> {
        let id = self
            .selection
            .current()
            .cloned()
            .ok_or(PosterError::NoSelection)?;
        let el = self.find_element(&id)?;
        let current = node_position(el);
        let bounds = self.measure_or_declared(&id, el);
        let target = current.offset(dx, dy).clamped(bounds);
        self.checkpoint();
        self.commit_position(&id, target);
        Ok(target)
    }

    // ---- drag sessions ------------------------------------------------

    /// Start dragging an element. Takes the history checkpoint for the
    /// whole drag, so intermediate positions do not pile up as one
    /// entry per pixel of movement.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::MissingContainer`] before the surface is
    /// mounted, [`PosterError::ElementNotFound`] for an unknown id.
    pub fn begin_drag(&mut self, id: &ElementId, pointer: Point) -> PosterResult<()> {
        let container = self.require_container()?;
        let el = self.find_element(id)?;
        let position = node_position(el);
        let zoom = self.scene.zoom.factor();
        let element_origin = Point::new(
            container.x + position.x * zoom,
            container.y + position.y * zoom,
        );
        self.checkpoint();
        self.drag.begin(id.clone(), pointer, element_origin);
        tracing::debug!(id = %id, "drag started");
        Ok(())
    }

    /// Convert a pointer move into a clamped position and apply it to
    /// the element and its rendered node. Applied on every update.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::InvalidOperation`] with no drag in
    /// flight, [`PosterError::MissingContainer`] if the surface
    /// unmounted mid-drag.
    pub fn update_drag(&mut self, pointer: Point) -> PosterResult<Position> {
        let id = self
            .drag
            .active()
            .cloned()
            .ok_or_else(|| PosterError::InvalidOperation("no drag in progress".to_owned()))?;
        let container = self.require_container()?;
        let el = self.find_element(&id)?;
        let bounds = self.measure_or_declared(&id, el);
        let zoom = self.scene.zoom.factor();
        let position = self
            .drag
            .update(pointer, container, zoom, bounds)
            .ok_or_else(|| PosterError::InvalidOperation("no drag in progress".to_owned()))?;
        self.commit_position(&id, position);
        Ok(position)
    }

    /// Finish the drag session. Returns the dragged element's id so the
    /// host knows the content changed; pushes no history entry (the
    /// checkpoint was taken at drag start).
    pub fn end_drag(&mut self) -> Option<ElementId> {
        let id = self.drag.end();
        if let Some(id) = &id {
            tracing::debug!(id = %id, "drag finished");
        }
        id
    }

    // ---- clipboard ----------------------------------------------------

    /// Copy the selected element's properties to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::NoSelection`] with nothing selected.
    pub fn copy(&mut self) -> PosterResult<()> {
        let record = self.selected().ok_or(PosterError::NoSelection)?;
        tracing::debug!(id = %record.id, "element copied");
        self.clipboard.copy(record);
        Ok(())
    }

    /// Paste the clipboard as a new element offset by (+20, +20) per
    /// paste from the copied position, clamped to the canvas. Selects
    /// and returns the clone.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::EmptyClipboard`] with nothing copied, or
    /// [`PosterError::MissingContainer`] before the surface is mounted.
    pub fn paste(&mut self) -> PosterResult<ElementRecord> {
        self.require_container()?;
        let mut candidate = self.clipboard.paste_candidate()?;
        let mut node = ElementFactory::node_from_record(&candidate);
        // the clone is not rendered yet, so clamp against declared sizes
        let bounds = declared_bounds(&node);
        candidate.position = candidate.position.clamped(bounds);
        apply_position(&mut node, candidate.position);
        candidate
            .styles
            .insert("left".to_owned(), format!("{}px", candidate.position.x));
        candidate
            .styles
            .insert("top".to_owned(), format!("{}px", candidate.position.y));
        candidate
            .styles
            .insert("position".to_owned(), "absolute".to_owned());

        self.checkpoint();
        self.scene.push_node(SceneNode::Element(node));
        self.selection.select(Some(candidate.id.clone()));
        tracing::debug!(id = %candidate.id, "element pasted");
        Ok(candidate)
    }

    // ---- history ------------------------------------------------------

    /// Whether undo would change state.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo would change state.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the last committed action, restoring the previous snapshot.
    /// Clears the selection; no-op returning `None` at the start of
    /// history.
    pub fn undo(&mut self) -> Option<String> {
        if !self.history.can_undo() {
            return None;
        }
        // Capture the live state the first time we step back, so redo
        // can come all the way forward again.
        if self.history.at_tip() {
            let live = self.snapshot();
            if self.history.current().is_some_and(|e| e.markup != live) {
                self.history.push(live);
            }
        }
        let markup = self.history.undo()?.markup.clone();
        self.restore(&markup);
        tracing::debug!("undo applied");
        Some(markup)
    }

    /// Redo the next snapshot. Clears the selection; no-op returning
    /// `None` at the end of history.
    pub fn redo(&mut self) -> Option<String> {
        let markup = self.history.redo()?.markup.clone();
        self.restore(&markup);
        tracing::debug!("redo applied");
        Some(markup)
    }

    // ---- import / export ----------------------------------------------

    /// Import markup: sanitize, extract, replace the scene. Clears the
    /// selection and returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::InvalidMarkup`] when sanitization leaves
    /// no element at all.
    pub fn import(&mut self, markup: &str) -> PosterResult<String> {
        let nodes = sanitize::parse_markup(markup);
        if !nodes.iter().any(|n| matches!(n, SceneNode::Element(_))) {
            return Err(PosterError::InvalidMarkup(
                "no usable elements in markup".to_owned(),
            ));
        }
        self.checkpoint();
        let zoom = self.scene.zoom;
        self.scene = Scene::from_nodes(nodes);
        self.scene.zoom = zoom;
        self.scene.extract();
        self.selection.clear();
        self.edit_mode = EditMode::Idle;
        let snapshot = self.scene.to_markup();
        tracing::info!(elements = self.scene.element_count(), "markup imported");
        Ok(snapshot)
    }

    /// Build the standalone export document for the current scene.
    #[must_use]
    pub fn export(&self) -> export::ExportedDocument {
        export::export_document(&self.scene)
    }

    // ---- inline text editing ------------------------------------------

    /// Enter inline editing for a text-bearing element. The draft
    /// starts as the element's current content. Beginning a new edit
    /// cancels any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::ElementNotFound`] for an unknown id and
    /// [`PosterError::InvalidOperation`] for image elements.
    pub fn begin_edit(&mut self, id: &ElementId) -> PosterResult<()> {
        let el = self.find_element(id)?;
        if el.kind == ElementKind::Image {
            return Err(PosterError::InvalidOperation(
                "image elements cannot be text-edited".to_owned(),
            ));
        }
        self.edit_mode = EditMode::Editing {
            id: id.clone(),
            draft: el.text_content(),
        };
        Ok(())
    }

    /// The uncommitted draft text, if an edit is in progress.
    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        match &self.edit_mode {
            EditMode::Editing { draft, .. } => Some(draft),
            EditMode::Idle => None,
        }
    }

    /// Replace the draft text of the edit in progress.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::InvalidOperation`] with no edit open.
    pub fn update_draft(&mut self, text: &str) -> PosterResult<()> {
        match &mut self.edit_mode {
            EditMode::Editing { draft, .. } => {
                *draft = text.to_owned();
                Ok(())
            }
            EditMode::Idle => Err(PosterError::InvalidOperation(
                "no edit in progress".to_owned(),
            )),
        }
    }

    /// Commit the draft: one checkpoint, then the content replacement.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::InvalidOperation`] with no edit open.
    pub fn commit_edit(&mut self) -> PosterResult<()> {
        let EditMode::Editing { id, draft } = std::mem::replace(&mut self.edit_mode, EditMode::Idle)
        else {
            return Err(PosterError::InvalidOperation(
                "no edit in progress".to_owned(),
            ));
        };
        self.set_content(&id, &draft)
    }

    /// Drop the draft without touching the scene.
    pub fn cancel_edit(&mut self) {
        self.edit_mode = EditMode::Idle;
    }

    // ---- internals ----------------------------------------------------

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, markup: &str) {
        self.scene.restore(markup);
        self.selection.clear();
        self.drag = DragEngine::default();
        self.edit_mode = EditMode::Idle;
    }

    fn require_container(&self) -> PosterResult<Point> {
        self.adapter
            .container_origin()
            .ok_or(PosterError::MissingContainer)
    }

    fn find_element(&self, id: &ElementId) -> PosterResult<&ElementNode> {
        self.scene
            .find(id.as_str())
            .ok_or_else(|| PosterError::ElementNotFound(id.to_string()))
    }

    fn measure_or_declared(&self, id: &ElementId, el: &ElementNode) -> Size {
        self.adapter
            .measure_bounds(id)
            .unwrap_or_else(|| declared_bounds(el))
    }

    fn commit_position(&mut self, id: &ElementId, position: Position) {
        if let Some(el) = self.scene.find_mut(id.as_str()) {
            apply_position(el, position);
        }
        self.adapter.set_position(id, position);
    }
}

/// Read the canvas-local origin from a node's inline styles.
fn node_position(el: &ElementNode) -> Position {
    Position::new(
        el.style_value("left").map_or(0.0, |v| parse_px(&v)),
        el.style_value("top").map_or(0.0, |v| parse_px(&v)),
    )
}

/// Write a position to a node, forcing absolute positioning.
fn apply_position(el: &mut ElementNode, position: Position) {
    el.set_style("position", "absolute");
    el.set_style("left", &format!("{}px", position.x));
    el.set_style("top", &format!("{}px", position.y));
}
