use super::{ConversionJob, FailurePolicy, JobKind};
use crate::config::JobOptions;
use crate::error::ConvertError;
use crate::output::ItemOutcome;
use crate::pipeline::document::{PdfBackend, SourceDocument};
use crate::pipeline::{encode, input};
use std::path::PathBuf;
use tracing::debug;

/// Render every page of one PDF to `{output_dir}/page_{n}.{ext}`.
pub struct RasterizeJob<'a> {
    backend: &'a dyn PdfBackend,
    input: PathBuf,
    output_dir: PathBuf,
    options: &'a JobOptions,
    source: Option<Box<dyn SourceDocument + 'a>>,
}

impl<'a> RasterizeJob<'a> {
    pub fn new(
        backend: &'a dyn PdfBackend,
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        options: &'a JobOptions,
    ) -> Self {
        Self {
            backend,
            input: input.into(),
            output_dir: output_dir.into(),
            options,
            source: None,
        }
    }
}

impl<'a> ConversionJob for RasterizeJob<'a> {
    fn kind(&self) -> JobKind {
        JobKind::Rasterize
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::FailFast
    }

    fn validate(&self) -> Result<(), ConvertError> {
        input::resolve_pdf(&self.input)?;
        input::require_dir(&self.output_dir)
    }

    fn prepare(&mut self) -> Result<usize, ConvertError> {
        let options = self.options;
        let format = options.image_format;
        if !encode::encoder_available(format) {
            return Err(ConvertError::EncoderUnavailable {
                format: format.name(),
            });
        }

        let source = self.backend.open(&self.input, options.password.as_deref())?;
        let pages = source.page_count();
        self.source = Some(source);
        Ok(pages)
    }

    fn item_label(&self, index: usize) -> String {
        format!("page {}", index + 1)
    }

    fn process_item(&mut self, index: usize) -> Result<ItemOutcome, ConvertError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ConvertError::Internal("rasterize job was not prepared".into()))?;

        let page = index + 1;
        let image = source
            .render_page(index, self.options.raster_size)
            .map_err(|e| ConvertError::RasterisationFailed {
                page,
                detail: e.to_string(),
            })?;

        let dest = input::page_image_path(&self.output_dir, page, self.options.image_format);
        encode::write_image(
            &image,
            self.options.image_format,
            self.options.compression_quality,
            &dest,
        )?;
        debug!("Wrote page {} → {}", page, dest.display());

        Ok(ItemOutcome::produced(index, self.item_label(index), dest))
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
        self.source = None;
        Ok(Vec::new())
    }
}
