//! Pixel formats the compositor can work in.

use std::io::Cursor;

use image::{ColorType, DynamicImage, ExtendedColorType, ImageFormat, Luma, Pixel, Rgb, Rgba};

use crate::options::Ink;
use crate::{Result, WatermarkError};

/// Supported source formats. Everything else is skipped by the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
    Luma,
}

impl PixelFormat {
    /// Map a source color type, as stored in the file, to a supported format.
    ///
    /// Indexed sources are passed in as `Unknown(bits)` (see
    /// [`stored_color_type`]) and rejected.
    pub fn from_original(color: ExtendedColorType) -> Result<Self> {
        match color {
            ExtendedColorType::Rgb8 => Ok(Self::Rgb),
            ExtendedColorType::Rgba8 => Ok(Self::Rgba),
            ExtendedColorType::L8 => Ok(Self::Luma),
            other => Err(WatermarkError::UnsupportedFormat(other)),
        }
    }

    /// Map a decoded color type to a supported format.
    pub fn from_color_type(color: ColorType) -> Result<Self> {
        Self::from_original(color.into())
    }

    pub fn of(img: &DynamicImage) -> Result<Self> {
        Self::from_color_type(img.color())
    }
}

/// Color type as stored in the container, before the decoder expands it.
///
/// `image` hands PNG palettes back as RGB/RGBA and GIF frames as RGBA, so
/// for those containers the header decides. Indexed data is reported as
/// `Unknown(bits_per_index)`. Other containers use `decoded` as given.
pub fn stored_color_type(
    container: Option<ImageFormat>,
    bytes: &[u8],
    decoded: ExtendedColorType,
) -> ExtendedColorType {
    match container {
        Some(ImageFormat::Png) => {
            let mut decoder = png::Decoder::new(Cursor::new(bytes));
            match decoder.read_header_info() {
                Ok(info) if info.color_type == png::ColorType::Indexed => {
                    ExtendedColorType::Unknown(info.bit_depth as u8)
                }
                _ => decoded,
            }
        }
        // GIF has no truecolor mode
        Some(ImageFormat::Gif) => ExtendedColorType::Unknown(8),
        _ => decoded,
    }
}

/// An 8-bit pixel type usable for the scratch canvas, tile and blend layers.
pub trait CanvasPixel: Pixel<Subpixel = u8> + Send + Sync + 'static {
    const FORMAT: PixelFormat;

    /// Opaque white background.
    fn white() -> Self;

    /// The ink color in this format.
    fn ink(ink: Ink) -> Self;
}

impl CanvasPixel for Rgb<u8> {
    const FORMAT: PixelFormat = PixelFormat::Rgb;

    fn white() -> Self {
        Rgb([255, 255, 255])
    }

    fn ink(ink: Ink) -> Self {
        Rgb([ink.r, ink.g, ink.b])
    }
}

impl CanvasPixel for Rgba<u8> {
    const FORMAT: PixelFormat = PixelFormat::Rgba;

    fn white() -> Self {
        Rgba([255, 255, 255, 255])
    }

    fn ink(ink: Ink) -> Self {
        Rgba([ink.r, ink.g, ink.b, 255])
    }
}

impl CanvasPixel for Luma<u8> {
    const FORMAT: PixelFormat = PixelFormat::Luma;

    fn white() -> Self {
        Luma([255])
    }

    fn ink(ink: Ink) -> Self {
        Luma([ink.luma()])
    }
}
