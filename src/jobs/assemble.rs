use super::{path_label, ConversionJob, FailurePolicy, JobKind};
use crate::error::ConvertError;
use crate::output::ItemOutcome;
use crate::pipeline::document::{fit_centered, PdfBackend, TargetDocument};
use crate::pipeline::{encode, input};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Place each image on its own page of a single output PDF.
///
/// Pages accumulate in one document for the whole run; it is written once
/// in [`ConversionJob::finish`], even if no image could be added.
pub struct AssembleJob<'a> {
    backend: &'a dyn PdfBackend,
    images: Vec<PathBuf>,
    output: PathBuf,
    document: Option<Box<dyn TargetDocument + 'a>>,
}

impl<'a> AssembleJob<'a> {
    pub fn new(backend: &'a dyn PdfBackend, images: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            images,
            output: output.into(),
            document: None,
        }
    }
}

impl ConversionJob for AssembleJob<'_> {
    fn kind(&self) -> JobKind {
        JobKind::Assemble
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::SkipItem
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.images.is_empty() {
            return Err(ConvertError::MissingInput {
                what: "input image file(s)",
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConvertError::MissingInput {
                what: "output PDF path",
            });
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<usize, ConvertError> {
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            input::ensure_dir(parent)?;
        }
        self.document = Some(self.backend.create()?);
        Ok(self.images.len())
    }

    fn item_label(&self, index: usize) -> String {
        self.images
            .get(index)
            .map(|p| path_label(p))
            .unwrap_or_default()
    }

    fn process_item(&mut self, index: usize) -> Result<ItemOutcome, ConvertError> {
        let label = self.item_label(index);
        let path = &self.images[index];
        if !path.is_file() {
            debug!("Skipping missing image {}", path.display());
            return Ok(ItemOutcome::skipped(index, label, "input file not found"));
        }

        let document = self
            .document
            .as_mut()
            .ok_or_else(|| ConvertError::Internal("assemble job was not prepared".into()))?;

        let image = encode::decode_image(path)?;
        let placement = fit_centered(document.default_page_size(), image.width(), image.height());
        document.add_image_page(&image, placement)?;

        Ok(ItemOutcome::accumulated(index, label))
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
        let Some(mut document) = self.document.take() else {
            return Ok(Vec::new());
        };
        if document.page_count() == 0 {
            warn!(
                "No input images were usable; writing an empty PDF to {}",
                self.output.display()
            );
        }
        document.save(&self.output)?;
        Ok(vec![self.output.clone()])
    }
}
