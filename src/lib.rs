//! # folio
//!
//! A paged notebook editor: rich-text pages shown two at a time, a
//! formatting toolbar driven by a cached format state, and export to plain
//! text, Markdown, a print-ready HTML document and per-page images.
//!
//! ## Features
//!
//! - Notebook of titled pages, navigated in two-page sets with page-turn transitions
//! - Formatting commands (marks, blocks, lists, indent, alignment) on any rich-text surface
//! - Markup compiled into a compact arena tree ([`model::RichText`])
//! - Exports: `.txt`, `.md`, print HTML and one PNG per non-blank page
//!
//! ## Quick Start
//!
//! ```
//! use folio::config::EditorConfig;
//! use folio::editor::{EditorCollaborators, FormatCommand, PagedDocumentEditor, SurfaceId};
//! use folio::export::{ExportFormat, MemoryDelivery};
//!
//! let mut editor = PagedDocumentEditor::open(EditorConfig::default(), EditorCollaborators::default());
//! editor.type_text("Hi");
//! editor.focus(SurfaceId::body(0));
//! editor.type_text("World");
//! editor.apply_format(FormatCommand::Bold, None);
//!
//! let outcome = editor.export(ExportFormat::Markdown);
//! assert!(matches!(outcome, folio::editor::ExportOutcome::Delivered { .. }));
//! ```
//!
//! ## Working with Documents
//!
//! The export functions work on a [`model::Document`] directly:
//!
//! ```
//! use folio::model::{Document, Page};
//! use folio::export::export_markdown;
//!
//! let doc = Document::from_pages(vec![Page::from_html("Hi", "<p>World</p>")]);
//! assert_eq!(export_markdown(&doc).unwrap(), "# Hi\n\nWorld");
//! ```

pub mod compiler;
pub mod config;
pub mod edit;
pub mod editor;
mod error;
pub mod export;
pub mod markdown;
pub mod model;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
