//! Error types for the pdfimg-convert library.
//!
//! Two error types mirror the two sides of every job:
//!
//! * [`ConvertError`]: anything that stops a job or an item inside it:
//!   validation of the user's inputs, missing codec capabilities, a page
//!   that cannot be rasterised, a save that fails. A job that ends early
//!   stores one of these in [`crate::output::JobResult::terminal_error`].
//!
//! * [`CodecError`]: a failure reported by the PDF engine behind the
//!   [`crate::pipeline::document`] traits. Converted into
//!   [`ConvertError::Codec`] at the job boundary.
//!
//! Whether an item error aborts the run or only skips the item is decided
//! by the job's [`crate::jobs::FailurePolicy`], not by the error itself.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal and per-item errors raised while running a conversion job.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// A required input (path list, page text, output path) was empty.
    #[error("Missing {what}: please provide {what} before starting the job")]
    MissingInput { what: &'static str },

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Output folder does not exist (rasterising never creates it).
    #[error("Output folder not found: '{path}'")]
    OutputDirNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Precondition errors ───────────────────────────────────────────────
    /// The image codec needed by the job was compiled out.
    #[error("{format} encoder not available; cannot write {format} images")]
    EncoderUnavailable { format: &'static str },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or to the directory containing it),\n\
or place the library next to the executable.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Item errors ───────────────────────────────────────────────────────
    /// pdfium could not render a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// An input image could not be opened or decoded.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    /// An image could not be encoded or written.
    #[error("Failed to encode image '{path}': {detail}")]
    ImageEncodeFailed { path: PathBuf, detail: String },

    /// A fail-fast job stopped at this item.
    #[error("Stopped at {item}: {source}")]
    ItemAborted {
        item: String,
        #[source]
        source: Box<ConvertError>,
    },

    // ── Terminal errors ───────────────────────────────────────────────────
    /// The PDF engine reported an error.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Could not create an output folder or file.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for errors detected before any item was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::MissingInput { .. }
                | ConvertError::InputNotFound { .. }
                | ConvertError::OutputDirNotFound { .. }
                | ConvertError::PermissionDenied { .. }
                | ConvertError::NotAPdf { .. }
                | ConvertError::InvalidConfig(_)
        )
    }
}

/// Errors reported by a PDF engine implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Header/trailer/xref is corrupt or the file cannot be opened.
    #[error("PDF '{path}' could not be loaded: {detail}")]
    Load { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A page could not be rendered (0-indexed page in `index`).
    #[error("Rendering page index {index} failed: {detail}")]
    Render { index: usize, detail: String },

    /// A new document or page could not be created.
    #[error("Could not create PDF document: {0}")]
    Create(String),

    /// An image could not be placed onto a page.
    #[error("Could not draw image onto page: {0}")]
    Draw(String),

    /// A page could not be copied from the source document.
    #[error("Copying page index {index} failed: {detail}")]
    Copy { index: usize, detail: String },

    /// The document could not be written to disk.
    #[error("Saving PDF '{path}' failed: {detail}")]
    Save { path: PathBuf, detail: String },
}
