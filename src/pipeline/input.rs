//! Input validation and output naming.
//!
//! Every output path is a pure function of an input path plus a fixed
//! naming rule, so re-running a job overwrites the same files instead of
//! accumulating copies.

use crate::config::ImageFormat;
use crate::error::ConvertError;
use crate::page_range::PageRange;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path: it must exist, be readable and start with `%PDF`.
pub fn resolve_pdf(path: &Path) -> Result<PathBuf, ConvertError> {
    if path.as_os_str().is_empty() {
        return Err(ConvertError::MissingInput { what: "input PDF" });
    }
    if !path.is_file() {
        return Err(ConvertError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ConvertError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ConvertError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}

/// Require an existing output folder.
pub fn require_dir(dir: &Path) -> Result<(), ConvertError> {
    if dir.as_os_str().is_empty() {
        return Err(ConvertError::MissingInput {
            what: "output folder",
        });
    }
    if !dir.is_dir() {
        return Err(ConvertError::OutputDirNotFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Create the output folder (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), ConvertError> {
    if dir.as_os_str().is_empty() {
        return Err(ConvertError::MissingInput {
            what: "output folder",
        });
    }
    std::fs::create_dir_all(dir).map_err(|e| ConvertError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Split a `;`-separated list of paths, dropping empty entries.
///
/// Multi-file pickers hand the selection over as one string in this form.
pub fn split_path_list(list: &str) -> Vec<PathBuf> {
    list.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// File name without directory or extension, e.g. `report` for `a/report.pdf`.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `{dir}/page_{page}.{ext}` for a 1-indexed page.
pub fn page_image_path(dir: &Path, page: usize, format: ImageFormat) -> PathBuf {
    dir.join(format!("page_{}.{}", page, format.extension()))
}

/// `{dir}/{stem}_compressed.jpg`.
pub fn compressed_image_path(dir: &Path, source: &Path) -> PathBuf {
    dir.join(format!("{}_compressed.jpg", base_name(source)))
}

/// `{dir}/{stem}_pages_{start}-{end}.pdf`.
pub fn split_pdf_path(dir: &Path, source: &Path, range: PageRange) -> PathBuf {
    dir.join(format!(
        "{}_pages_{}-{}.pdf",
        base_name(source),
        range.start(),
        range.end()
    ))
}
