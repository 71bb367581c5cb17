//! Collaborator stages the jobs are built from.
//!
//! ```text
//! input ──▶ document/render ──▶ encode
//! (paths)   (pdfium engine)     (image codecs)
//! ```
//!
//! 1. [`input`]   : validate source paths and derive output names
//! 2. [`document`]: PDF engine seam (load, render, create, copy, save)
//! 3. [`render`]  : the pdfium implementation of [`document`]
//! 4. [`encode`]  : decode images, write PNG/JPEG/BMP at a given quality

pub mod document;
pub mod encode;
pub mod input;
pub mod render;
