//! In-memory PDF engine for integration tests.
//!
//! "PDF" files are plain text:
//!
//! ```text
//! %PDF-fake pages=5 password=secret
//! image 40x20
//! copy 3
//! ```
//!
//! The header gives the page count (and optionally a user password); the
//! remaining lines describe pages written by [`FakeTarget`]. Files still start
//! with `%PDF`, so the magic-byte check in the jobs accepts them.

#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use pdfimg_convert::pipeline::document::{
    PdfBackend, Placement, SourceDocument, TargetDocument,
};
use pdfimg_convert::{CodecError, RasterSize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    /// 0-indexed page whose render fails.
    pub fail_render_at: Option<usize>,
    /// 0-indexed `add_image_page` call that fails; no page is added for it.
    pub fail_draw_at: Option<usize>,
    /// Every placement passed to `add_image_page`, in order.
    pub placements: Mutex<Vec<Placement>>,
}

impl FakeBackend {
    pub fn failing_render_at(index: usize) -> Self {
        Self {
            fail_render_at: Some(index),
            ..Self::default()
        }
    }

    pub fn failing_draw_at(call: usize) -> Self {
        Self {
            fail_draw_at: Some(call),
            ..Self::default()
        }
    }
}

impl PdfBackend for FakeBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, CodecError> {
        let text = std::fs::read_to_string(path).map_err(|e| CodecError::Load {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let header = text.lines().next().unwrap_or_default();

        let mut pages = None;
        let mut expected_password = None;
        for field in header.split_whitespace().skip(1) {
            if let Some(n) = field.strip_prefix("pages=") {
                pages = n.parse::<usize>().ok();
            } else if let Some(p) = field.strip_prefix("password=") {
                expected_password = Some(p.to_string());
            }
        }
        let pages = pages.ok_or_else(|| CodecError::Load {
            path: path.to_path_buf(),
            detail: "not a fake pdf".into(),
        })?;

        match (expected_password, password) {
            (Some(_), None) => {
                return Err(CodecError::PasswordRequired {
                    path: path.to_path_buf(),
                })
            }
            (Some(expected), Some(given)) if expected != given => {
                return Err(CodecError::WrongPassword {
                    path: path.to_path_buf(),
                })
            }
            _ => {}
        }

        Ok(Box::new(FakeSource {
            backend: self,
            pages,
        }))
    }

    fn create<'a>(&'a self) -> Result<Box<dyn TargetDocument + 'a>, CodecError> {
        Ok(Box::new(FakeTarget {
            backend: Some(self),
            pages: Vec::new(),
        }))
    }
}

pub struct FakeSource<'a> {
    backend: &'a FakeBackend,
    pages: usize,
}

impl SourceDocument for FakeSource<'_> {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn render_page(&self, index: usize, size: RasterSize) -> Result<DynamicImage, CodecError> {
        if self.backend.fail_render_at == Some(index) {
            return Err(CodecError::Render {
                index,
                detail: "corrupt page stream".into(),
            });
        }
        let shade = (index * 40 % 256) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            size.width,
            size.height,
            Rgb([shade, 128, 255 - shade]),
        )))
    }

    fn extract_pages(&self, indices: &[usize]) -> Result<Box<dyn TargetDocument + '_>, CodecError> {
        let pages = indices
            .iter()
            .map(|&i| {
                if i < self.pages {
                    Ok(format!("copy {}", i + 1))
                } else {
                    Err(CodecError::Copy {
                        index: i,
                        detail: "page index out of range".into(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(FakeTarget {
            backend: None,
            pages,
        }))
    }
}

pub struct FakeTarget<'a> {
    backend: Option<&'a FakeBackend>,
    pages: Vec<String>,
}

impl TargetDocument for FakeTarget<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_image_page(&mut self, image: &DynamicImage, placement: Placement) -> Result<(), CodecError> {
        if let Some(backend) = self.backend {
            if let Ok(mut placements) = backend.placements.lock() {
                let call = placements.len();
                placements.push(placement);
                if backend.fail_draw_at == Some(call) {
                    return Err(CodecError::Draw("unsupported pixel layout".into()));
                }
            }
        }
        self.pages
            .push(format!("image {}x{}", image.width(), image.height()));
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), CodecError> {
        let mut text = format!("%PDF-fake pages={}\n", self.pages.len());
        for page in &self.pages {
            text.push_str(page);
            text.push('\n');
        }
        std::fs::write(path, text).map_err(|e| CodecError::Save {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

/// Write a fake PDF with `pages` pages to `dir/name`.
pub fn fake_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("%PDF-fake pages={pages}\n")).unwrap();
    path
}

/// Write a password-protected fake PDF.
pub fn fake_locked_pdf(dir: &Path, name: &str, pages: usize, password: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(
        &path,
        format!("%PDF-fake pages={pages} password={password}\n"),
    )
    .unwrap();
    path
}

/// Body lines of a fake PDF written by [`FakeTarget::save`].
pub fn fake_pages(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

/// Save a solid-colour image in the format implied by `name`'s extension.
pub fn solid_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([200, 30, 90]))
        .save(&path)
        .unwrap();
    path
}
