use super::{ConversionJob, FailurePolicy, JobKind};
use crate::config::JobOptions;
use crate::error::ConvertError;
use crate::output::ItemOutcome;
use crate::page_range::{self, PageSpec};
use crate::pipeline::document::{PdfBackend, SourceDocument};
use crate::pipeline::input;
use std::path::PathBuf;
use tracing::{debug, info};

/// Write one PDF per page range named in `pages`.
pub struct SplitJob<'a> {
    backend: &'a dyn PdfBackend,
    input: PathBuf,
    output_dir: PathBuf,
    pages: String,
    password: Option<&'a str>,
    source: Option<Box<dyn SourceDocument + 'a>>,
    spec: PageSpec,
}

impl<'a> SplitJob<'a> {
    pub fn new(
        backend: &'a dyn PdfBackend,
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        pages: impl Into<String>,
        options: &'a JobOptions,
    ) -> Self {
        Self {
            backend,
            input: input.into(),
            output_dir: output_dir.into(),
            pages: pages.into(),
            password: options.password.as_deref(),
            source: None,
            spec: PageSpec::default(),
        }
    }

    /// Ranges parsed in [`ConversionJob::prepare`]; empty before that.
    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }
}

impl ConversionJob for SplitJob<'_> {
    fn kind(&self) -> JobKind {
        JobKind::Split
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::SkipItem
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.pages.trim().is_empty() {
            return Err(ConvertError::MissingInput {
                what: "pages to extract",
            });
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConvertError::MissingInput {
                what: "output folder",
            });
        }
        input::resolve_pdf(&self.input).map(drop)
    }

    fn prepare(&mut self) -> Result<usize, ConvertError> {
        input::ensure_dir(&self.output_dir)?;
        let source = self.backend.open(&self.input, self.password)?;
        let total = source.page_count();

        self.spec = page_range::parse(&self.pages, total);
        info!(
            "'{}' selects {} range(s) of {} pages",
            self.pages.trim(),
            self.spec.len(),
            total
        );

        self.source = Some(source);
        Ok(self.spec.len())
    }

    fn item_label(&self, index: usize) -> String {
        self.spec
            .get(index)
            .map(|r| format!("pages {r}"))
            .unwrap_or_default()
    }

    fn process_item(&mut self, index: usize) -> Result<ItemOutcome, ConvertError> {
        let label = self.item_label(index);
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ConvertError::Internal("split job was not prepared".into()))?;
        let range = self
            .spec
            .get(index)
            .ok_or_else(|| ConvertError::Internal(format!("no page range at index {index}")))?;

        let total = source.page_count();
        let indices: Vec<usize> = range
            .pages()
            .filter(|&p| p >= 1 && p <= total)
            .map(|p| p - 1)
            .collect();

        let mut document = source.extract_pages(&indices)?;
        if document.page_count() == 0 {
            debug!("Range {} produced no pages; nothing saved", range);
            return Ok(ItemOutcome::skipped(index, label, "range contains no pages"));
        }

        let dest = input::split_pdf_path(&self.output_dir, &self.input, range);
        document.save(&dest)?;
        debug!(
            "Wrote {} page(s) → {}",
            document.page_count(),
            dest.display()
        );

        Ok(ItemOutcome::produced(index, label, dest))
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
        self.source = None;
        Ok(Vec::new())
    }
}
