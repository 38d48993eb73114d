//! Image I/O backend trait and shared error type.
//!
//! The [`ImageBackend`] trait covers the three file operations the batch
//! needs: decode a source, encode a trimmed result, and copy an untouched
//! source byte for byte. Pixel work (rotation, scanning, cropping) is pure and
//! lives in [`trim`](super::trim); it never goes through the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! `MockBackend` below to inject decode, encode and copy failures without
//! crafting broken files.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Image has no pixels to encode")]
    EmptyImage,
}

/// File operations behind the batch.
pub trait ImageBackend: Sync {
    /// Decode an image file into 8-bit RGBA.
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode `img` to `path`, picking the encoder from the path's extension.
    fn save(&self, img: &RgbaImage, path: &Path) -> Result<(), BackendError>;

    /// Copy `source` to `dest` verbatim, overwriting `dest`.
    fn copy(&self, source: &Path, dest: &Path) -> Result<(), BackendError>;
}
