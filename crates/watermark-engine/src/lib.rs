//! Tiled text watermark compositing.
//!
//! Renders a rotated text block on an oversampled scratch canvas, crops it
//! back down, and blends it onto the source raster. Works on 8-bit RGB,
//! RGBA and greyscale images without changing their format or size.

pub mod compose;
pub mod compositor;
pub mod font;
pub mod format;
pub mod geometry;
pub mod options;
pub mod rotate;
pub mod text;

use std::path::PathBuf;

use image::ExtendedColorType;

// Re-exports for convenience
pub use compositor::{FileOutcome, Watermarker};
pub use font::{load_font, resolve_font};
pub use format::{CanvasPixel, PixelFormat};
pub use geometry::{CropSize, Rect, crop_box, crop_size, paste_offset};
pub use options::{Ink, WatermarkOptions};

/// Errors that can occur while watermarking an image.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    #[error("Unsupported pixel format: {0:?}")]
    UnsupportedFormat(ExtendedColorType),

    #[error("Font not found: {name} (searched {searched} location(s))")]
    FontNotFound { name: String, searched: usize },

    #[error("Failed to parse font data (TTF/OTF): {}", path.display())]
    InvalidFont { path: PathBuf },

    #[error("Invalid watermark options: {0}")]
    InvalidOptions(String),

    #[error("Dimension mismatch: base {base:?}, layer {layer:?}")]
    DimensionMismatch { base: (u32, u32), layer: (u32, u32) },

    #[error("Unknown image container: {}", path.display())]
    UnknownContainer { path: PathBuf },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for watermark operations.
pub type Result<T> = std::result::Result<T, WatermarkError>;
