//! Outcome types returned by the job runner.

use crate::error::ConvertError;
use crate::jobs::JobKind;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// What happened to a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    /// 0-indexed position in the job's item sequence.
    pub index: usize,
    /// Human-readable item name.
    pub label: String,
    pub succeeded: bool,
    /// Set when the item was skipped instead of processed.
    pub skipped_reason: Option<String>,
    /// File written for this item, if the item writes its own file.
    pub output: Option<PathBuf>,
}

impl ItemOutcome {
    /// The item wrote `output`.
    pub fn produced(index: usize, label: impl Into<String>, output: PathBuf) -> Self {
        Self {
            index,
            label: label.into(),
            succeeded: true,
            skipped_reason: None,
            output: Some(output),
        }
    }

    /// The item succeeded but contributes to a file written at the end of the job.
    pub fn accumulated(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            succeeded: true,
            skipped_reason: None,
            output: None,
        }
    }

    /// The item was left out.
    pub fn skipped(index: usize, label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            succeeded: false,
            skipped_reason: Some(reason.into()),
            output: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped_reason.is_some()
    }
}

/// How the shell should describe a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// At least one item succeeded and no error stopped the job.
    Completed,
    /// The job ran to the end without error but no item succeeded.
    NothingProduced,
    /// A cancel request stopped the job between items.
    Cancelled,
    /// A terminal error stopped the job.
    Failed,
}

/// Summary of one job run.
#[derive(Debug, Serialize)]
pub struct JobResult {
    pub kind: JobKind,
    /// Items the job planned to process (0 if it never got that far).
    pub items_total: usize,
    /// Items the runner attempted, including skipped and failed ones.
    pub items_processed: usize,
    pub items_succeeded: usize,
    pub items_skipped: usize,
    /// Every file written, in the order it was written.
    pub outputs: Vec<PathBuf>,
    pub outcomes: Vec<ItemOutcome>,
    #[serde(serialize_with = "serialize_error")]
    pub terminal_error: Option<ConvertError>,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl JobResult {
    pub(crate) fn new(kind: JobKind) -> Self {
        Self {
            kind,
            items_total: 0,
            items_processed: 0,
            items_succeeded: 0,
            items_skipped: 0,
            outputs: Vec::new(),
            outcomes: Vec::new(),
            terminal_error: None,
            cancelled: false,
            duration_ms: 0,
        }
    }

    /// A result for a job that failed before the runner could start it.
    pub fn failed(kind: JobKind, error: ConvertError) -> Self {
        let mut result = Self::new(kind);
        result.terminal_error = Some(error);
        result
    }

    pub fn outcome(&self) -> JobOutcome {
        if self.terminal_error.is_some() {
            JobOutcome::Failed
        } else if self.cancelled {
            JobOutcome::Cancelled
        } else if self.items_succeeded == 0 {
            JobOutcome::NothingProduced
        } else {
            JobOutcome::Completed
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == JobOutcome::Completed
    }

    /// Convert into a `Result`, surfacing the terminal error if any.
    pub fn into_result(mut self) -> Result<JobResult, ConvertError> {
        match self.terminal_error.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// One-line message suitable for a dialog or status bar.
    pub fn summary(&self) -> String {
        match self.outcome() {
            JobOutcome::Completed => format!(
                "{} completed successfully: {}/{} items{}",
                self.kind,
                self.items_succeeded,
                self.items_total,
                if self.items_skipped > 0 {
                    format!(" ({} skipped)", self.items_skipped)
                } else {
                    String::new()
                }
            ),
            JobOutcome::NothingProduced => format!("{}: {}", self.kind, self.kind.nothing_message()),
            JobOutcome::Cancelled => format!(
                "{} cancelled after {}/{} items",
                self.kind, self.items_processed, self.items_total
            ),
            JobOutcome::Failed => format!(
                "An error occurred during {}: {}",
                self.kind,
                self.terminal_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default()
            ),
        }
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<ConvertError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}
