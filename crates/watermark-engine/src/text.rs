//! Text measurement and drawing on the scratch canvas.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::ImageBuffer;
use imageproc::drawing::draw_text_mut;

use crate::format::CanvasPixel;

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Height of one line of text, ascent to descent.
pub fn text_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent()).ceil() as u32
}

/// Bounding box `(width, height)` of a single line of text.
pub fn text_extent(font: &impl Font, scale: PxScale, text: &str) -> (u32, u32) {
    (measure_text_width(font, scale, text), text_height(font, scale))
}

/// Draw text centered on both axes.
///
/// Text larger than the canvas starts at a negative offset and is clipped.
/// Returns the text extent used for centering.
pub fn draw_centered_text<P: CanvasPixel>(
    img: &mut ImageBuffer<P, Vec<u8>>,
    font: &impl Font,
    scale: PxScale,
    text: &str,
    color: P,
) -> (u32, u32) {
    let (text_w, text_h) = text_extent(font, scale, text);
    let x = (i64::from(img.width()) - i64::from(text_w)) / 2;
    let y = (i64::from(img.height()) - i64::from(text_h)) / 2;
    draw_text_mut(img, color, x as i32, y as i32, scale, font, text);
    (text_w, text_h)
}

/// Create a blank white canvas.
pub fn blank_canvas<P: CanvasPixel>(width: u32, height: u32) -> ImageBuffer<P, Vec<u8>> {
    ImageBuffer::from_pixel(width, height, P::white())
}
