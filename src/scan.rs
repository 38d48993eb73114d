//! Source directory listing and image classification.
//!
//! The scan is flat: only the direct children of the source directory are
//! listed. Every child becomes an [`Entry`], in file-name order, and counts
//! toward the batch total whether or not it is processed.
//!
//! ## Classification
//!
//! An entry is an image when it is not a directory and its extension is one
//! of `.jpg .jpeg .png .webp .bmp .tiff`, compared case-insensitively. The
//! extension is everything after the last dot, so a bare `.png` counts.
//!
//! ```text
//! a.JPG      → image
//! a.Png      → image
//! a.txt      → skipped
//! a          → skipped (no extension)
//! .png       → image
//! shots.png/ → skipped (directory)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Image,
    Skipped,
}

/// One child of the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_image(&self) -> bool {
        self.kind == EntryKind::Image
    }
}

/// Whether a file name carries one of the accepted image extensions.
pub fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// List and classify the direct children of `dir`.
pub fn scan(dir: &Path) -> Result<Vec<Entry>, ScanError> {
    let read_err = |source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(dir).map_err(read_err)? {
        let dir_entry = dir_entry.map_err(read_err)?;
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        let is_dir = dir_entry.file_type().is_ok_and(|t| t.is_dir());
        let kind = if !is_dir && is_image_name(&name) {
            EntryKind::Image
        } else {
            EntryKind::Skipped
        };
        entries.push(Entry {
            name,
            path: dir_entry.path(),
            kind,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
