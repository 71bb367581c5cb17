use super::{path_label, ConversionJob, FailurePolicy, JobKind};
use crate::config::{ImageFormat, JobOptions};
use crate::error::ConvertError;
use crate::output::ItemOutcome;
use crate::pipeline::{encode, input};
use std::path::PathBuf;
use tracing::debug;

/// Re-encode each image as `{output_dir}/{stem}_compressed.jpg`.
///
/// The output is always JPEG, whatever the source format.
pub struct CompressJob {
    images: Vec<PathBuf>,
    output_dir: PathBuf,
    quality: u8,
}

impl CompressJob {
    pub fn new(images: Vec<PathBuf>, output_dir: impl Into<PathBuf>, options: &JobOptions) -> Self {
        Self {
            images,
            output_dir: output_dir.into(),
            quality: options.compression_quality,
        }
    }
}

impl ConversionJob for CompressJob {
    fn kind(&self) -> JobKind {
        JobKind::Compress
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::FailFast
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.images.is_empty() {
            return Err(ConvertError::MissingInput {
                what: "input image file(s)",
            });
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConvertError::MissingInput {
                what: "output folder",
            });
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<usize, ConvertError> {
        input::ensure_dir(&self.output_dir)?;
        if !encode::encoder_available(ImageFormat::Jpeg) {
            return Err(ConvertError::EncoderUnavailable {
                format: ImageFormat::Jpeg.name(),
            });
        }
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

        let image = encode::decode_image(path)?;
        let dest = input::compressed_image_path(&self.output_dir, path);
        encode::write_jpeg(&image, self.quality, &dest)?;

        Ok(ItemOutcome::produced(index, label, dest))
    }
}
