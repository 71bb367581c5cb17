//! Progress-callback trait for per-item job events.
//!
//! Inject an [`Arc<dyn JobProgressCallback>`] via
//! [`crate::config::JobOptionsBuilder::progress_callback`] to receive events
//! as the runner works through a job. The observer owns every presentation
//! concern (progress bars, enabling buttons); the jobs know nothing about it.
//!
//! # Example
//!
//! ```rust
//! use pdfimg_convert::{JobOptions, JobProgressCallback, ProgressUpdate};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl JobProgressCallback for Printer {
//!     fn on_progress(&self, update: &ProgressUpdate) {
//!         eprintln!("{:.0}%", update.percent);
//!     }
//! }
//!
//! let options = JobOptions::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use crate::jobs::JobKind;
use crate::output::{ItemOutcome, JobResult};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of how far a job has come. Emitted after every item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    /// `completed / total * 100`; 100 when the job has no items.
    pub percent: f64,
}

impl ProgressUpdate {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Called by [`crate::runner::JobRunner`] as it drives a job.
///
/// Items are processed strictly one at a time, so calls never overlap, but
/// the runner lives on a blocking worker thread: implementations must be
/// `Send + Sync`. All methods default to no-ops.
pub trait JobProgressCallback: Send + Sync {
    /// Called once the item count is known, before the first item.
    fn on_job_start(&self, kind: JobKind, total_items: usize) {
        let _ = (kind, total_items);
    }

    /// Called just before an item is processed.
    ///
    /// # Arguments
    /// * `index`: 0-indexed item position
    /// * `label`: human-readable item name ("page 3", a file name, "pages 1-2")
    fn on_item_start(&self, index: usize, total_items: usize, label: &str) {
        let _ = (index, total_items, label);
    }

    /// Called after an item produced output or was skipped.
    fn on_item_complete(&self, outcome: &ItemOutcome) {
        let _ = outcome;
    }

    /// Called when an item fails, whether or not the job continues.
    fn on_item_error(&self, index: usize, label: &str, error: &str) {
        let _ = (index, label, error);
    }

    /// Called after every item with the running totals.
    fn on_progress(&self, update: &ProgressUpdate) {
        let _ = update;
    }

    /// Called once when the run ends, successfully or not.
    fn on_job_complete(&self, result: &JobResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl JobProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::JobOptions`].
pub type ProgressCallback = Arc<dyn JobProgressCallback>;
