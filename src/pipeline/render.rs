//! pdfium-backed implementation of the PDF engine traits.
//!
//! ## Binding
//!
//! `pdfium-render` loads the pdfium shared library at runtime. [`bind`]
//! searches, in order: `PDFIUM_LIB_PATH` (a library file or the directory
//! holding it), the current directory, then the system library path.
//!
//! ## Threads
//!
//! pdfium keeps thread-local state and must not be driven from async tasks.
//! [`crate::convert`] therefore binds and runs whole jobs inside
//! `tokio::task::spawn_blocking`.

use crate::config::RasterSize;
use crate::error::{CodecError, ConvertError};
use crate::pipeline::document::{PdfBackend, Placement, SourceDocument, TargetDocument};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library, trying the configured path first.
pub fn bind() -> Result<Pdfium, ConvertError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(configured) if !configured.is_empty() => {
            let path = PathBuf::from(configured);
            let library = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", library.display());
            Pdfium::bind_to_library(&library)
        }
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| ConvertError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

/// [`PdfBackend`] over a bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind pdfium via [`bind`] and wrap it.
    pub fn bind() -> Result<Self, ConvertError> {
        bind().map(Self::new)
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, CodecError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        CodecError::WrongPassword {
                            path: path.to_path_buf(),
                        }
                    } else {
                        CodecError::PasswordRequired {
                            path: path.to_path_buf(),
                        }
                    }
                } else {
                    CodecError::Load {
                        path: path.to_path_buf(),
                        detail: err_str,
                    }
                }
            })?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(Box::new(PdfiumSource {
            pdfium: &self.pdfium,
            document,
        }))
    }

    fn create<'a>(&'a self) -> Result<Box<dyn TargetDocument + 'a>, CodecError> {
        let document = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| CodecError::Create(format!("{:?}", e)))?;
        Ok(Box::new(PdfiumTarget { document }))
    }
}

struct PdfiumSource<'a> {
    pdfium: &'a Pdfium,
    document: PdfDocument<'a>,
}

impl SourceDocument for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, size: RasterSize) -> Result<DynamicImage, CodecError> {
        let render_error = |e: PdfiumError| CodecError::Render {
            index,
            detail: format!("{:?}", e),
        };

        let page = self.document.pages().get(index as u16).map_err(render_error)?;

        let render_config =
            PdfRenderConfig::new().set_target_size(size.width as i32, size.height as i32);

        let bitmap = page.render_with_config(&render_config).map_err(render_error)?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }

    fn extract_pages(&self, indices: &[usize]) -> Result<Box<dyn TargetDocument + '_>, CodecError> {
        let mut document = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| CodecError::Create(format!("{:?}", e)))?;

        for (dest, &index) in indices.iter().enumerate() {
            document
                .pages_mut()
                .copy_page_from_document(&self.document, index as u16, dest as u16)
                .map_err(|e| CodecError::Copy {
                    index,
                    detail: format!("{:?}", e),
                })?;
        }

        Ok(Box::new(PdfiumTarget { document }))
    }
}

struct PdfiumTarget<'a> {
    document: PdfDocument<'a>,
}

impl TargetDocument for PdfiumTarget<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn add_image_page(&mut self, image: &DynamicImage, placement: Placement) -> Result<(), CodecError> {
        let size = self.default_page_size();
        let draw_error = |e: PdfiumError| CodecError::Draw(format!("{:?}", e));

        // The image object only borrows the document, so a failure here
        // leaves the page list untouched.
        let mut object = PdfPageImageObject::new_with_size(
            &self.document,
            image,
            PdfPoints::new(placement.width),
            PdfPoints::new(placement.height),
        )
        .map_err(draw_error)?;
        object
            .translate(PdfPoints::new(placement.x), PdfPoints::new(placement.y))
            .map_err(draw_error)?;

        let mut page = self
            .document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(
                PdfPoints::new(size.width),
                PdfPoints::new(size.height),
            ))
            .map_err(|e| CodecError::Create(format!("{:?}", e)))?;

        if let Err(e) = page.objects_mut().add_image_object(object) {
            if let Err(cleanup) = page.delete() {
                warn!("Could not remove blank page after failed draw: {:?}", cleanup);
            }
            return Err(draw_error(e));
        }
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), CodecError> {
        self.document
            .save_to_file(path)
            .map_err(|e| CodecError::Save {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })
    }
}
