//! # Image Trim
//!
//! Batch border removal for scanned and screenshotted images. Every image in
//! a source directory is checked for a uniform border; bordered images are
//! cropped and re-encoded into the destination directory, clean images are
//! copied there byte for byte.
//!
//! # Architecture
//!
//! ```text
//! scan      source/  →  [Entry]          (list + classify, no decoding)
//! process   [Entry]  →  destination/     (decode → trim → encode or copy)
//! output    events   →  stdout           (per-file lines + summary)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Flat directory listing and extension filter |
//! | [`process`] | Batch driver: per-file outcomes, progress events, optional rayon pool |
//! | [`imaging`] | Color distance, the trim engine, encoders, the [`imaging::ImageBackend`] trait |
//! | [`config`] | `ImageTrim.json` loading, merging over defaults, validation, saving |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Scan Direction
//!
//! The trim engine only ever inspects leading columns. Rotating the image a
//! quarter turn counter-clockwise between steps brings each edge in turn to
//! the left, so four identical scan-and-crop steps cover top, right, bottom
//! and left. After the fourth step the image is back in its original
//! orientation.
//!
//! ## Copy When Untouched
//!
//! An image with no border is never decoded-then-encoded on the way out. The
//! source file is copied verbatim, so lossy sources do not lose a generation.
//!
//! ## Failures Stay Per File
//!
//! Only an unreadable source directory stops a run. Everything that can go
//! wrong with a single file ends up in that file's report line and the batch
//! carries on.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
