//! Selection state and the single-slot clipboard.

use serde::{Deserialize, Serialize};

use crate::{ElementId, ElementRecord, PosterError, PosterResult};

/// The single active selection: at most one element id, or none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    current: Option<ElementId>,
}

impl Selection {
    /// Replace the current selection.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.current = id;
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The currently selected id, if any.
    #[must_use]
    pub fn current(&self) -> Option<&ElementId> {
        self.current.as_ref()
    }

    /// Whether the given id is selected.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.current.as_ref() == Some(id)
    }
}

/// Offset applied to pasted elements so the clone does not cover its
/// source exactly.
pub const PASTE_OFFSET: f32 = 20.0;

/// Single-slot clipboard holding a value-copy of one element record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clipboard {
    slot: Option<ElementRecord>,
}

impl Clipboard {
    /// Store a value-copy of the record. Replaces any previous copy.
    pub fn copy(&mut self, record: ElementRecord) {
        self.slot = Some(record);
    }

    /// Whether nothing has been copied yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// The stored record, if any.
    #[must_use]
    pub fn stored(&self) -> Option<&ElementRecord> {
        self.slot.as_ref()
    }

    /// Produce a paste candidate: the stored record with a fresh id and
    /// its position offset by (+20, +20). Each call advances the stored
    /// position, so repeated pastes cascade (+20, +40, ...) from the
    /// copied original; copying again resets the cascade. The caller
    /// clamps the offset position against the element's measured bounds
    /// and inserts the clone into the scene.
    ///
    /// # Errors
    ///
    /// Returns [`PosterError::EmptyClipboard`] when nothing was copied.
    pub fn paste_candidate(&mut self) -> PosterResult<ElementRecord> {
        let source = self.slot.as_mut().ok_or(PosterError::EmptyClipboard)?;
        source.position = source.position.offset(PASTE_OFFSET, PASTE_OFFSET);
        let mut clone = source.clone();
        clone.id = ElementId::generate(clone.kind.id_prefix());
        clone.attributes.insert("id".to_owned(), clone.id.as_str().to_owned());
        Ok(clone)
    }
}
