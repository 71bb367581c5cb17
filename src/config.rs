//! Configuration shared by every conversion job.
//!
//! All knobs live in [`JobOptions`], built via [`JobOptionsBuilder`]. Inputs
//! and destinations are not options: each job takes its own paths, because
//! their shape differs per operation (one PDF, N images, one PDF + pages).

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use crate::runner::CancelToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default raster width in pixels (A4 at 300 DPI).
pub const DEFAULT_RASTER_WIDTH: u32 = 2480;
/// Default raster height in pixels (A4 at 300 DPI).
pub const DEFAULT_RASTER_HEIGHT: u32 = 3508;
/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 300;
/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 80;

/// Configuration for a conversion job.
///
/// # Example
/// ```rust
/// use pdfimg_convert::{ImageFormat, JobOptions};
///
/// let options = JobOptions::builder()
///     .image_format(ImageFormat::Jpeg)
///     .compression_quality(60)
///     .build()
///     .unwrap();
/// assert_eq!(options.compression_quality, 60);
/// ```
#[derive(Clone)]
pub struct JobOptions {
    /// Output format for rasterised pages. Default: PNG.
    pub image_format: ImageFormat,

    /// JPEG quality, 0–100. Default: 80.
    ///
    /// Used by the recompress job and by the rasterise job when
    /// `image_format` is JPEG.
    pub compression_quality: u8,

    /// Pixel size every page is rendered at. Default: 2480 × 3508.
    ///
    /// This is a fixed target, not derived from the page's own size. Unless
    /// set explicitly, the builder derives it from `dpi` as A4 at that
    /// resolution.
    pub raster_size: RasterSize,

    /// Rendering resolution used to derive `raster_size`. Default: 300.
    pub dpi: u32,

    /// Password for encrypted source PDFs.
    pub password: Option<String>,

    /// Pause between items in milliseconds. Default: 0.
    pub throttle_ms: u64,

    /// Receives per-item progress events.
    pub progress_callback: Option<ProgressCallback>,

    /// Checked before every item; once set the job stops.
    pub cancel: Option<CancelToken>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            image_format: ImageFormat::default(),
            compression_quality: DEFAULT_QUALITY,
            raster_size: RasterSize::default(),
            dpi: DEFAULT_DPI,
            password: None,
            throttle_ms: 0,
            progress_callback: None,
            cancel: None,
        }
    }
}

impl fmt::Debug for JobOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobOptions")
            .field("image_format", &self.image_format)
            .field("compression_quality", &self.compression_quality)
            .field("raster_size", &self.raster_size)
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("throttle_ms", &self.throttle_ms)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn JobProgressCallback>"),
            )
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl JobOptions {
    /// Create a new builder for `JobOptions`.
    pub fn builder() -> JobOptionsBuilder {
        JobOptionsBuilder {
            options: Self::default(),
            explicit_size: false,
        }
    }
}

/// Builder for [`JobOptions`].
#[derive(Debug)]
pub struct JobOptionsBuilder {
    options: JobOptions,
    explicit_size: bool,
}

impl JobOptionsBuilder {
    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.options.image_format = format;
        self
    }

    pub fn compression_quality(mut self, quality: u8) -> Self {
        self.options.compression_quality = quality.min(100);
        self
    }

    /// Render at exactly `width` × `height` pixels, whatever the DPI.
    pub fn raster_size(mut self, width: u32, height: u32) -> Self {
        self.options.raster_size = RasterSize { width, height };
        self.explicit_size = true;
        self
    }

    /// Render A4 pages at `dpi`, unless [`Self::raster_size`] is also set.
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.options.password = Some(pwd.into());
        self
    }

    pub fn throttle_ms(mut self, ms: u64) -> Self {
        self.options.throttle_ms = ms;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.options.progress_callback = Some(cb);
        self
    }

    pub fn cancel(mut self, token: CancelToken) -> Self {
        self.options.cancel = Some(token);
        self
    }

    /// Build the options, validating constraints.
    pub fn build(mut self) -> Result<JobOptions, ConvertError> {
        if self.options.dpi == 0 {
            return Err(ConvertError::InvalidConfig("DPI must be ≥ 1".into()));
        }
        if !self.explicit_size {
            self.options.raster_size = RasterSize::a4_at(self.options.dpi);
        }
        let o = &self.options;
        if o.raster_size.width == 0 || o.raster_size.height == 0 {
            return Err(ConvertError::InvalidConfig(format!(
                "raster size must be non-zero, got {}",
                o.raster_size
            )));
        }
        Ok(self.options)
    }
}

// ── Value types ──────────────────────────────────────────────────────────

/// Raster formats the rasterise job can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    /// Lowercase file extension used in output names.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// Upper-case display name.
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Bmp => "BMP",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            other => Err(ConvertError::InvalidConfig(format!(
                "unsupported image format '{other}' (expected png, jpeg or bmp)"
            ))),
        }
    }
}

/// Target pixel dimensions for a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl Default for RasterSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_RASTER_WIDTH,
            height: DEFAULT_RASTER_HEIGHT,
        }
    }
}

impl RasterSize {
    /// ISO A4 (210 × 297 mm) at `dpi`, rounded to whole pixels.
    pub fn a4_at(dpi: u32) -> Self {
        const A4_WIDTH_IN: f64 = 210.0 / 25.4;
        const A4_HEIGHT_IN: f64 = 297.0 / 25.4;
        Self {
            width: (A4_WIDTH_IN * f64::from(dpi)).round() as u32,
            height: (A4_HEIGHT_IN * f64::from(dpi)).round() as u32,
        }
    }
}

impl fmt::Display for RasterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
