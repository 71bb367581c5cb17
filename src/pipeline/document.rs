//! PDF engine seam.
//!
//! Jobs talk to the PDF engine only through these traits. The production
//! implementation is [`crate::pipeline::render::PdfiumBackend`]; tests plug
//! in an in-memory engine. Documents borrow the backend that opened them,
//! so a job holding a document cannot outlive its engine binding.

use crate::config::RasterSize;
use crate::error::CodecError;
use image::DynamicImage;
use std::path::Path;

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait, the engine's default page.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

/// Where and how large to draw an image on a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Opens and creates PDF documents.
pub trait PdfBackend {
    /// Load an existing PDF for rendering or page import.
    ///
    /// The password must outlive the document; pdfium holds on to it.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, CodecError>;

    /// Create a new, empty PDF.
    fn create<'a>(&'a self) -> Result<Box<dyn TargetDocument + 'a>, CodecError>;
}

/// A loaded, read-only PDF.
pub trait SourceDocument {
    fn page_count(&self) -> usize;

    /// Render the 0-indexed page `index` to exactly `size` pixels.
    fn render_page(&self, index: usize, size: RasterSize) -> Result<DynamicImage, CodecError>;

    /// Build a new document holding copies of the given 0-indexed pages, in
    /// the order given.
    fn extract_pages(&self, indices: &[usize]) -> Result<Box<dyn TargetDocument + '_>, CodecError>;
}

/// A PDF being built.
pub trait TargetDocument {
    fn page_count(&self) -> usize;

    /// Size of pages created by [`TargetDocument::add_image_page`].
    fn default_page_size(&self) -> PageSize {
        PageSize::A4
    }

    /// Append a page of [`TargetDocument::default_page_size`] and draw
    /// `image` onto it at `placement`.
    ///
    /// On error no page is added.
    fn add_image_page(&mut self, image: &DynamicImage, placement: Placement) -> Result<(), CodecError>;

    /// Write the document to `path`.
    fn save(&mut self, path: &Path) -> Result<(), CodecError>;
}

/// Uniformly scale an image of `image_width` × `image_height` units to fit
/// `page`, centred.
///
/// The scale is `min(page_w / image_w, page_h / image_h)`, so the aspect
/// ratio is kept and the image touches the page edge on at least one axis.
pub fn fit_centered(page: PageSize, image_width: u32, image_height: u32) -> Placement {
    let iw = image_width.max(1) as f32;
    let ih = image_height.max(1) as f32;
    let scale = (page.width / iw).min(page.height / ih);
    let width = iw * scale;
    let height = ih * scale;
    Placement {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
    }
}
