//! Error types for poster editing operations.

use thiserror::Error;

/// Result type for poster editing operations.
pub type PosterResult<T> = Result<T, PosterError>;

/// Errors that can occur while editing a poster.
///
/// All of these are recoverable and local to the failed command: the
/// editor never commits a partial mutation on failure.
#[derive(Debug, Error)]
pub enum PosterError {
    /// Imported markup could not be turned into an editable scene.
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),

    /// A selection-dependent command was invoked with nothing selected.
    #[error("No element selected")]
    NoSelection,

    /// Paste was invoked with nothing on the clipboard.
    #[error("Clipboard is empty")]
    EmptyClipboard,

    /// A command needs the canvas surface, which is not mounted yet.
    #[error("Canvas container is not available")]
    MissingContainer,

    /// Element not found in the scene.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid operation on an element.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
