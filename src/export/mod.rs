//! Notebook export: plain text, Markdown, print HTML and page images.
//!
//! Every exporter works on a [`Document`] and skips blank pages (pages whose
//! trimmed plain title and body are both empty). When nothing is left the
//! exporters return `None` instead of producing an empty file.
//!
//! # Example
//!
//! ```
//! use folio::export::{Exporter, MarkdownExporter};
//! use folio::model::{Document, Page};
//!
//! let doc = Document::from_pages(vec![Page::from_html("Plans", "<p>Ship it</p>")]);
//! let artifact = MarkdownExporter::new().export(&doc).unwrap();
//! assert_eq!(artifact.filename, "notebook_export.md");
//! assert_eq!(&*artifact.bytes().unwrap(), b"# Plans\n\nShip it");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::model::Document;

mod delivery;
mod html_synth;
mod images;
mod markdown;
mod print;
mod text;

pub use delivery::{
    Artifact, Delivery, DirectoryDelivery, MemoryDelivery, Payload, data_url, decode_data_url,
};
pub use html_synth::{escape_xml, synthesize_html};
pub use images::{
    ImageExportOptions, ImageExportSummary, PageFrame, Rasterizer, RegionStyle, export_images,
};
pub use markdown::export_markdown;
pub use print::{PAGE_BREAK, PrintHost, print_document};
pub use text::{export_text, plain_text};

/// Default plain-text export filename.
pub const TEXT_FILENAME: &str = "notebook_export.txt";
/// Default Markdown export filename.
pub const MARKDOWN_FILENAME: &str = "notebook_export.md";
/// Default prefix of per-page image filenames.
pub const IMAGE_FILENAME_PREFIX: &str = "notebook_page_";

/// Export formats offered by the export menu (`data-format` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Markdown,
    Pdf,
    Images,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Markdown,
        ExportFormat::Pdf,
        ExportFormat::Images,
    ];

    /// Menu value of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Images => "img",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "pdf" | "print" => Ok(ExportFormat::Pdf),
            "img" | "images" | "png" => Ok(ExportFormat::Images),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for single-file exporters.
///
/// Exporters hold their configuration and turn a document into one
/// [`Artifact`], or `None` when there is nothing to export.
pub trait Exporter {
    fn export(&self, document: &Document) -> Option<Artifact>;
}

/// Plain-text exporter.
#[derive(Debug, Clone)]
pub struct TextExporter {
    filename: String,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            filename: TEXT_FILENAME.to_string(),
        }
    }
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl Exporter for TextExporter {
    fn export(&self, document: &Document) -> Option<Artifact> {
        export_text(document).map(|text| Artifact::text(&self.filename, "text/plain", text))
    }
}

/// Markdown exporter.
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    filename: String,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            filename: MARKDOWN_FILENAME.to_string(),
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl Exporter for MarkdownExporter {
    fn export(&self, document: &Document) -> Option<Artifact> {
        export_markdown(document).map(|md| Artifact::text(&self.filename, "text/markdown", md))
    }
}
