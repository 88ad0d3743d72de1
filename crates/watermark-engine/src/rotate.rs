//! Canvas rotation.
//!
//! The whole scratch canvas is rotated, not the glyphs, so the text block
//! turns about the canvas center and the canvas keeps its size.

use image::ImageBuffer;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use tracing::debug;

use crate::format::CanvasPixel;

/// Rotate a canvas counter-clockwise by `degrees` about its center.
///
/// Output has the same dimensions; corners uncovered by the rotation are white.
pub fn rotate_canvas<P: CanvasPixel>(
    canvas: &ImageBuffer<P, Vec<u8>>,
    degrees: f32,
) -> ImageBuffer<P, Vec<u8>> {
    let (w, h) = canvas.dimensions();
    debug!(w, h, degrees, "Rotating watermark canvas");

    if degrees.rem_euclid(360.0) == 0.0 {
        return canvas.clone();
    }

    // imageproc rotates clockwise for positive angles
    rotate_about_center(
        canvas,
        -degrees.to_radians(),
        Interpolation::Bilinear,
        P::white(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Create a white test canvas with one dark pixel right of center.
    fn create_marked_canvas(size: u32, offset: u32) -> GrayImage {
        let mut img = GrayImage::from_pixel(size, size, Luma([255]));
        let c = size / 2;
        img.put_pixel(c + offset, c, Luma([0]));
        img
    }

    #[test]
    fn test_rotate_preserves_dimensions() {
        let img = GrayImage::from_pixel(40, 20, Luma([255]));
        let rotated = rotate_canvas(&img, 30.0);
        assert_eq!(rotated.dimensions(), (40, 20));
    }

    #[test]
    fn test_rotate_fills_corners_white() {
        let img = GrayImage::from_pixel(41, 41, Luma([0]));
        let rotated = rotate_canvas(&img, 45.0);
        assert_eq!(rotated.get_pixel(0, 0), &Luma([255]));
        assert_eq!(rotated.get_pixel(40, 40), &Luma([255]));
        assert_eq!(rotated.get_pixel(20, 20), &Luma([0]));
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let img = create_marked_canvas(21, 5);
        assert_eq!(rotate_canvas(&img, 0.0), img);
        assert_eq!(rotate_canvas(&img, 360.0), img);
    }

    #[test]
    fn test_rotate_ninety_counter_clockwise() {
        // A mark right of center ends up above center after a CCW quarter turn
        let img = create_marked_canvas(21, 6);
        let rotated = rotate_canvas(&img, 90.0);
        let darkest = |ys: std::ops::RangeInclusive<u32>| {
            ys.flat_map(|y| (9..=11).map(move |x| (x, y)))
                .map(|(x, y)| rotated.get_pixel(x, y)[0])
                .min()
                .unwrap_or(255)
        };
        let above = darkest(3..=6);
        let below = darkest(14..=17);
        assert!(above < 128, "expected dark pixel above center, got {above}");
        assert_eq!(below, 255);
    }
}
