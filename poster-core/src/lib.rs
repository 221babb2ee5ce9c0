//! # Poster Core
//!
//! Engine of an editable HTML poster: a sanitized scene tree over a
//! fixed 720×720 canvas, with linear undo/redo, selection, clipboard,
//! bounded drag math and standalone-document export. The host UI owns
//! rendering and input; this crate owns every state transition.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                poster-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Scene Tree      │  Commands                │
//! │  - Sanitizer     │  - Selection/clipboard   │
//! │  - Extraction    │  - Drag sessions         │
//! │  - Factories     │  - Inline text edits     │
//! ├─────────────────────────────────────────────┤
//! │  History         │  Export                  │
//! │  - Snapshots     │  - Standalone document   │
//! │  - Linear cursor │  - Marker stripping      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clipboard;
pub mod drag;
pub mod editor;
pub mod element;
pub mod error;
pub mod export;
pub mod extract;
pub mod factory;
pub mod history;
pub mod node;
pub mod render;
pub mod sanitize;
pub mod scene;

pub use clipboard::{Clipboard, Selection, PASTE_OFFSET};
pub use drag::{DragEngine, Point};
pub use editor::{EditMode, PosterEditor, SAMPLE_POSTER};
pub use element::{ElementId, ElementKind, ElementRecord, Position, Size};
pub use error::{PosterError, PosterResult};
pub use export::{export_document, ExportedDocument};
pub use factory::ElementFactory;
pub use history::{HistoryEntry, HistoryStore};
pub use node::{ElementNode, SceneNode};
pub use render::{HeadlessRenderer, RenderAdapter, SelectionTheme, SELECTION_MARKER_CLASS};
pub use sanitize::sanitize;
pub use scene::{Scene, Zoom};

/// Poster core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canvas width in pixels. The surface never resizes or scrolls.
pub const CANVAS_WIDTH: f32 = 720.0;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 720.0;

/// Milliseconds since the Unix epoch, used for generated ids, history
/// timestamps and export metadata.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
