//! Entry points: one function per operation.
//!
//! Each operation comes in three shapes:
//!
//! * `async fn op(..)`: moves the job onto `spawn_blocking`, so the calling
//!   task (typically a UI or CLI event loop) stays responsive;
//! * `fn op_sync(..)`: binds pdfium and runs on the current thread;
//! * `fn op_with(backend, ..)`: runs against a caller-supplied
//!   [`PdfBackend`], e.g. a pdfium binding shared by several jobs.
//!
//! All of them return a [`JobResult`]; use [`JobResult::into_result`] for
//! `?`-style error handling.

use crate::config::JobOptions;
use crate::error::ConvertError;
use crate::jobs::{AssembleJob, CompressJob, JobKind, RasterizeJob, SplitJob};
use crate::output::JobResult;
use crate::pipeline::document::PdfBackend;
use crate::pipeline::render::PdfiumBackend;
use crate::runner::JobRunner;
use std::path::{Path, PathBuf};

// ── Rasterise ────────────────────────────────────────────────────────────

/// Render every page of `input` to `{output_dir}/page_{n}.{ext}`.
///
/// # Example
/// ```rust,no_run
/// use pdfimg_convert::{pdf_to_images, ImageFormat, JobOptions};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = JobOptions::builder().image_format(ImageFormat::Png).build()?;
/// let result = pdf_to_images("report.pdf", "out/", &options).await.into_result()?;
/// println!("{} pages written", result.items_succeeded);
/// # Ok(())
/// # }
/// ```
pub async fn pdf_to_images(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    options: &JobOptions,
) -> JobResult {
    let input = input.as_ref().to_path_buf();
    let output_dir = output_dir.as_ref().to_path_buf();
    let options = options.clone();
    run_blocking(JobKind::Rasterize, move || {
        pdf_to_images_sync(&input, &output_dir, &options)
    })
    .await
}

/// Blocking variant of [`pdf_to_images`].
pub fn pdf_to_images_sync(input: &Path, output_dir: &Path, options: &JobOptions) -> JobResult {
    match PdfiumBackend::bind() {
        Ok(backend) => pdf_to_images_with(&backend, input, output_dir, options),
        Err(e) => JobResult::failed(JobKind::Rasterize, e),
    }
}

/// [`pdf_to_images`] against an explicit PDF engine.
pub fn pdf_to_images_with(
    backend: &dyn PdfBackend,
    input: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> JobResult {
    let mut job = RasterizeJob::new(backend, input, output_dir, options);
    JobRunner::new(options).run(&mut job)
}

// ── Assemble ─────────────────────────────────────────────────────────────

/// Put each image in `images` on its own A4 page of one PDF at `output`.
///
/// Images that do not exist are skipped.
pub async fn images_to_pdf(
    images: Vec<PathBuf>,
    output: impl AsRef<Path>,
    options: &JobOptions,
) -> JobResult {
    let output = output.as_ref().to_path_buf();
    let options = options.clone();
    run_blocking(JobKind::Assemble, move || {
        images_to_pdf_sync(images, &output, &options)
    })
    .await
}

/// Blocking variant of [`images_to_pdf`].
pub fn images_to_pdf_sync(images: Vec<PathBuf>, output: &Path, options: &JobOptions) -> JobResult {
    match PdfiumBackend::bind() {
        Ok(backend) => images_to_pdf_with(&backend, images, output, options),
        Err(e) => JobResult::failed(JobKind::Assemble, e),
    }
}

/// [`images_to_pdf`] against an explicit PDF engine.
pub fn images_to_pdf_with(
    backend: &dyn PdfBackend,
    images: Vec<PathBuf>,
    output: &Path,
    options: &JobOptions,
) -> JobResult {
    let mut job = AssembleJob::new(backend, images, output);
    JobRunner::new(options).run(&mut job)
}

// ── Recompress ───────────────────────────────────────────────────────────

/// Re-encode each image as `{output_dir}/{stem}_compressed.jpg` at
/// `options.compression_quality`.
///
/// No PDF engine is involved, so there is no `_with` variant.
pub async fn compress_images(
    images: Vec<PathBuf>,
    output_dir: impl AsRef<Path>,
    options: &JobOptions,
) -> JobResult {
    let output_dir = output_dir.as_ref().to_path_buf();
    let options = options.clone();
    run_blocking(JobKind::Compress, move || {
        compress_images_sync(images, &output_dir, &options)
    })
    .await
}

/// Blocking variant of [`compress_images`].
pub fn compress_images_sync(images: Vec<PathBuf>, output_dir: &Path, options: &JobOptions) -> JobResult {
    let mut job = CompressJob::new(images, output_dir, options);
    JobRunner::new(options).run(&mut job)
}

// ── Split ────────────────────────────────────────────────────────────────

/// Write one PDF per range in `pages` (e.g. `"1-3, 5; 8-9"`) to
/// `{output_dir}/{stem}_pages_{start}-{end}.pdf`.
///
/// A page text that selects nothing yields
/// [`crate::output::JobOutcome::NothingProduced`], not an error.
pub async fn split_pdf(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    pages: impl Into<String>,
    options: &JobOptions,
) -> JobResult {
    let input = input.as_ref().to_path_buf();
    let output_dir = output_dir.as_ref().to_path_buf();
    let pages = pages.into();
    let options = options.clone();
    run_blocking(JobKind::Split, move || {
        split_pdf_sync(&input, &output_dir, &pages, &options)
    })
    .await
}

/// Blocking variant of [`split_pdf`].
pub fn split_pdf_sync(input: &Path, output_dir: &Path, pages: &str, options: &JobOptions) -> JobResult {
    match PdfiumBackend::bind() {
        Ok(backend) => split_pdf_with(&backend, input, output_dir, pages, options),
        Err(e) => JobResult::failed(JobKind::Split, e),
    }
}

/// [`split_pdf`] against an explicit PDF engine.
pub fn split_pdf_with(
    backend: &dyn PdfBackend,
    input: &Path,
    output_dir: &Path,
    pages: &str,
    options: &JobOptions,
) -> JobResult {
    let mut job = SplitJob::new(backend, input, output_dir, pages, options);
    JobRunner::new(options).run(&mut job)
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run_blocking<F>(kind: JobKind, f: F) -> JobResult
where
    F: FnOnce() -> JobResult + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| {
            JobResult::failed(kind, ConvertError::Internal(format!("{kind} task panicked: {e}")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::JobOutcome;

    #[tokio::test]
    async fn compress_with_no_images_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = compress_images(Vec::new(), dir.path(), &JobOptions::default()).await;
        assert_eq!(result.outcome(), JobOutcome::Failed);
        assert!(result.terminal_error.unwrap().is_validation());
    }

    #[tokio::test]
    async fn compress_with_only_missing_images_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![dir.path().join("gone.png")];
        let result = compress_images(images, dir.path().join("out"), &JobOptions::default()).await;
        assert_eq!(result.outcome(), JobOutcome::NothingProduced);
        assert_eq!(result.items_skipped, 1);
    }
}
