//! Image processing, pure Rust apart from libwebp for lossy WebP output.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` → RGBA8 |
//! | **Similarity** | [`color::is_similar`] (normalized RGB distance) |
//! | **Trim** | [`trim::trim_borders`] (`imageops::rotate270` + `crop_imm`) |
//! | **Encode** | [`codec::OutputFormat`] (`image` encoders, `webp` for `.webp`) |
//!
//! The module is split into:
//! - **Parameters**: clamped value types ([`Threshold`], [`Quality`], [`BorderColor`])
//! - **Color**: the 16-bit color model and distance test
//! - **Trim**: the rotate-and-crop loop (pure, unit testable)
//! - **Codec**: per-format encoders
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod codec;
pub mod color;
mod params;
pub mod rust_backend;
pub mod trim;

pub use backend::{BackendError, ImageBackend};
pub use codec::OutputFormat;
pub use color::{Color, is_similar};
pub use params::{BorderColor, Quality, Threshold};
pub use rust_backend::RustBackend;
pub use trim::{CropRecord, TrimOutcome, trim_borders};
