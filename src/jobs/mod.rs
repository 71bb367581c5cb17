//! The four conversion jobs.
//!
//! Each job maps its inputs onto a sequence of items and knows how to
//! process one item; [`crate::runner::JobRunner`] owns the loop, progress
//! and outcome bookkeeping.
//!
//! | Job | Items | Output | On item error |
//! |-----|-------|--------|---------------|
//! | [`RasterizeJob`] | pages of one PDF | one image per page | abort |
//! | [`AssembleJob`] | image paths | one PDF, saved at the end | skip |
//! | [`CompressJob`] | image paths | one JPEG per image | abort |
//! | [`SplitJob`] | parsed page ranges | one PDF per range | skip |
//!
//! Missing input images are skipped silently by both image-list jobs.

mod assemble;
mod compress;
mod rasterize;
mod split;

pub use assemble::AssembleJob;
pub use compress::CompressJob;
pub use rasterize::RasterizeJob;
pub use split::SplitJob;

use crate::error::ConvertError;
use crate::output::ItemOutcome;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which operation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Rasterize,
    Assemble,
    Compress,
    Split,
}

impl JobKind {
    /// Message for a run that finished without producing anything.
    pub fn nothing_message(&self) -> &'static str {
        match self {
            JobKind::Rasterize => "The PDF has no pages; no images were written.",
            JobKind::Assemble => "None of the input images were found; the PDF has no pages.",
            JobKind::Compress => "None of the input images were found; nothing was compressed.",
            JobKind::Split => "No pages were extracted based on the provided input.",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobKind::Rasterize => "PDF to Image conversion",
            JobKind::Assemble => "Images to PDF conversion",
            JobKind::Compress => "Image compression",
            JobKind::Split => "PDF splitting",
        })
    }
}

/// What the runner does when [`ConversionJob::process_item`] returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole job; the error becomes the terminal error.
    FailFast,
    /// Record the item as skipped and continue with the next one.
    SkipItem,
}

/// One batch operation, driven item by item by the runner.
///
/// Call order: `validate`, `prepare`, `process_item(0..n)`, `finish`. The
/// runner stops at the first `Err` from any step except `process_item`,
/// where [`ConversionJob::failure_policy`] decides.
pub trait ConversionJob {
    fn kind(&self) -> JobKind;

    fn failure_policy(&self) -> FailurePolicy;

    /// Check inputs without touching any codec.
    fn validate(&self) -> Result<(), ConvertError>;

    /// Open inputs, check codec preconditions and return the item count.
    fn prepare(&mut self) -> Result<usize, ConvertError>;

    /// Human-readable name for item `index`.
    fn item_label(&self, index: usize) -> String;

    fn process_item(&mut self, index: usize) -> Result<ItemOutcome, ConvertError>;

    /// Flush accumulated output; returns any files written here.
    fn finish(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
        Ok(Vec::new())
    }
}

/// Label for an image-path item: the file name, or the path if it has none.
fn path_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
