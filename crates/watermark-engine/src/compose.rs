//! Image composition utilities: crop, paste and blend.

use image::{ImageBuffer, imageops};
use tracing::debug;

use crate::format::CanvasPixel;
use crate::geometry::{Rect, paste_offset};
use crate::text::blank_canvas;
use crate::{Result, WatermarkError};

/// Copy a rectangle out of a canvas. The rectangle must lie inside the canvas.
pub fn crop<P: CanvasPixel>(canvas: &ImageBuffer<P, Vec<u8>>, rect: Rect) -> ImageBuffer<P, Vec<u8>> {
    imageops::crop_imm(canvas, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Paste `tile` onto a white raster of exactly `width` x `height`, centered.
///
/// Parts of the tile falling outside the raster are dropped.
pub fn paste_centered<P: CanvasPixel>(
    width: u32,
    height: u32,
    tile: &ImageBuffer<P, Vec<u8>>,
) -> ImageBuffer<P, Vec<u8>> {
    let mut layer = blank_canvas::<P>(width, height);
    let (x, y) = paste_offset((width, height), tile.dimensions());
    debug!(x, y, tile_w = tile.width(), tile_h = tile.height(), "Pasting watermark tile");
    imageops::replace(&mut layer, tile, x, y);
    layer
}

/// Linear blend of two same-sized rasters.
///
/// Every channel, alpha included, becomes `base + alpha * (layer - base)`.
pub fn blend<P: CanvasPixel>(
    base: &ImageBuffer<P, Vec<u8>>,
    layer: &ImageBuffer<P, Vec<u8>>,
    alpha: f32,
) -> Result<ImageBuffer<P, Vec<u8>>> {
    if base.dimensions() != layer.dimensions() {
        return Err(WatermarkError::DimensionMismatch {
            base: base.dimensions(),
            layer: layer.dimensions(),
        });
    }

    let data: Vec<u8> = base
        .as_raw()
        .iter()
        .zip(layer.as_raw())
        .map(|(&b, &l)| blend_channel(b, l, alpha))
        .collect();

    let (w, h) = base.dimensions();
    ImageBuffer::from_raw(w, h, data).ok_or(WatermarkError::DimensionMismatch {
        base: (w, h),
        layer: layer.dimensions(),
    })
}

fn blend_channel(base: u8, layer: u8, alpha: f32) -> u8 {
    let b = f32::from(base);
    (b + alpha * (f32::from(layer) - b)).round().clamp(0.0, 255.0) as u8
}
