//! # pdfimg-convert
//!
//! Batch conversion between PDF documents and raster images.
//!
//! ## Operations
//!
//! | Operation | Input | Output |
//! |-----------|-------|--------|
//! | [`pdf_to_images`] | one PDF | `page_{n}.{png,jpeg,bmp}` per page |
//! | [`images_to_pdf`] | N images | one PDF, one centred image per A4 page |
//! | [`compress_images`] | N images | `{stem}_compressed.jpg` per image |
//! | [`split_pdf`] | one PDF + page text | `{stem}_pages_{a}-{b}.pdf` per range |
//!
//! ## Job engine
//!
//! ```text
//! entry point ──▶ JobRunner ──▶ ConversionJob ──▶ pipeline (pdfium, image)
//!                    │
//!                    └─▶ JobProgressCallback (after every item)
//! ```
//!
//! Every operation is a [`jobs::ConversionJob`]: a sequence of items plus a
//! failure policy. [`runner::JobRunner`] processes the items strictly in
//! order, reports a [`ProgressUpdate`] after each one, honours a
//! [`CancelToken`] between items and returns a [`JobResult`].
//!
//! Rasterise and recompress stop at the first failing item. Assemble and
//! split skip items they cannot use and carry on. Missing input images are
//! always skipped silently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfimg_convert::{split_pdf, JobOptions, JobOutcome};
//!
//! #[tokio::main]
//! async fn main() {
//!     let result = split_pdf("book.pdf", "chapters/", "1-12, 13-40", &JobOptions::default()).await;
//!     match result.outcome() {
//!         JobOutcome::Completed => println!("wrote {:?}", result.outputs),
//!         _ => eprintln!("{}", result.summary()),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfimg` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! pdfium itself is loaded at runtime; set `PDFIUM_LIB_PATH` if it is not on
//! the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod jobs;
pub mod output;
pub mod page_range;
pub mod pipeline;
pub mod progress;
pub mod runner;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ImageFormat, JobOptions, JobOptionsBuilder, RasterSize};
pub use convert::{
    compress_images, compress_images_sync, images_to_pdf, images_to_pdf_sync, images_to_pdf_with,
    pdf_to_images, pdf_to_images_sync, pdf_to_images_with, split_pdf, split_pdf_sync,
    split_pdf_with,
};
pub use error::{CodecError, ConvertError};
pub use jobs::{ConversionJob, FailurePolicy, JobKind};
pub use output::{ItemOutcome, JobOutcome, JobResult};
pub use page_range::{parse as parse_page_ranges, PageRange, PageSpec};
pub use progress::{JobProgressCallback, NoopProgressCallback, ProgressCallback, ProgressUpdate};
pub use runner::{CancelToken, JobRunner};
