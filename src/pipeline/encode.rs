//! Raster codec: decode input images and write output images.
//!
//! JPEG carries no alpha channel, so anything written as JPEG is flattened
//! to RGB first. pdfium renders RGBA bitmaps; without this step the encoder
//! rejects them.

use crate::config::ImageFormat;
use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Whether this build can write `format`.
pub fn encoder_available(format: ImageFormat) -> bool {
    image::ImageFormat::from(format).writing_enabled()
}

/// Open and decode an image file, guessing the format from its contents.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| ConvertError::ImageDecodeFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
        .decode()
        .map_err(|e| ConvertError::ImageDecodeFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
}

/// Write `img` to `dest` as `format`. `quality` applies to JPEG only.
pub fn write_image(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    dest: &Path,
) -> Result<(), ConvertError> {
    match format {
        ImageFormat::Jpeg => write_jpeg(img, quality, dest),
        other => img
            .save_with_format(dest, other.into())
            .map_err(|e| ConvertError::ImageEncodeFailed {
                path: dest.to_path_buf(),
                detail: e.to_string(),
            }),
    }
}

/// Write `img` to `dest` as a baseline JPEG at `quality` (0–100).
///
/// The encoder's scale starts at 1, so a quality of 0 is written as 1.
pub fn write_jpeg(img: &DynamicImage, quality: u8, dest: &Path) -> Result<(), ConvertError> {
    let quality = quality.clamp(1, 100);
    let file = File::create(dest).map_err(|e| ConvertError::OutputWriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let rgb = img.to_rgb8();
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&rgb)
        .map_err(|e| ConvertError::ImageEncodeFailed {
            path: dest.to_path_buf(),
            detail: e.to_string(),
        })?;

    debug!(
        "Encoded {}x{} JPEG (q={}) → {}",
        rgb.width(),
        rgb.height(),
        quality,
        dest.display()
    );
    Ok(())
}
