//! Error types for folio operations.

use thiserror::Error;

/// Errors raised while exporting or loading a notebook.
///
/// The editor itself never lets these escape: it turns them into notices.
/// They surface directly only through the library export functions, the
/// CLI and the wasm bindings.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data URL: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    #[error("Failed to rasterize page {page}: {reason}")]
    Rasterize { page: usize, reason: String },

    #[error("No rasterizer available for image export")]
    RasterizerUnavailable,

    #[error("Print host failed: {0}")]
    Print(String),

    #[error("No print host available")]
    PrintUnavailable,

    #[error("Animation backend failed: {0}")]
    Animation(String),

    #[error("Unknown formatting command: {0}")]
    UnknownCommand(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Surface(#[from] crate::surface::SurfaceError),
}

pub type Result<T> = std::result::Result<T, Error>;
