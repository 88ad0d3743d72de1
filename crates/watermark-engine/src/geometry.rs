//! Crop and paste geometry for the rotated text block.
//!
//! All functions here are pure; they only turn sizes and angles into
//! rectangles and offsets.

/// Size of the axis-aligned box cut out of the rotated canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSize {
    pub width: f64,
    pub height: f64,
}

/// Pixel rectangle inside a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Crop size for a `text_w` x `text_h` block rotated by `angle_deg`.
///
/// With `diag` the half-diagonal of the block and `base` its diagonal angle,
/// width is `2 * diag * cos(base + angle)` and height `2 * diag * sin(base + angle)`.
pub fn crop_size(text_w: f64, text_h: f64, angle_deg: f64) -> CropSize {
    let diag = ((text_w / 2.0).powi(2) + (text_h / 2.0).powi(2)).sqrt();
    if diag == 0.0 {
        return CropSize {
            width: 0.0,
            height: 0.0,
        };
    }
    let base = (text_h / text_w).atan();
    let theta = base + angle_deg.to_radians();

    CropSize {
        width: (2.0 * diag * theta.cos()).abs(),
        height: (2.0 * diag * theta.sin()).abs(),
    }
}

/// Centered crop box on a `canvas_w` x `canvas_h` canvas.
///
/// Pads one pixel on every side, raises the top edge by `vertical_bias`,
/// then clamps to the canvas. The result is never empty.
pub fn crop_box(canvas_w: u32, canvas_h: u32, size: CropSize, vertical_bias: u32) -> Rect {
    let (cw, ch) = (f64::from(canvas_w), f64::from(canvas_h));

    let left = ((cw - size.width) / 2.0 - 1.0) as i64;
    let top = ((ch - size.height) / 2.0 - 1.0) as i64 - i64::from(vertical_bias);
    let right = ((cw + size.width) / 2.0 + 1.0) as i64;
    let bottom = ((ch + size.height) / 2.0 + 1.0) as i64;

    let (x0, x1) = clamp_span(left, right, canvas_w);
    let (y0, y1) = clamp_span(top, bottom, canvas_h);

    Rect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    }
}

fn clamp_span(start: i64, end: i64, limit: u32) -> (u32, u32) {
    let limit = i64::from(limit.max(1));
    let start = start.clamp(0, limit - 1);
    let end = end.clamp(start + 1, limit);
    (start as u32, end as u32)
}

/// Offset that centers `tile` on `target`, one pixel up and left.
///
/// May be negative when the tile is larger than the target.
pub fn paste_offset(target: (u32, u32), tile: (u32, u32)) -> (i64, i64) {
    let axis = |t: u32, s: u32| ((f64::from(t) - f64::from(s)) / 2.0 - 1.0) as i64;
    (axis(target.0, tile.0), axis(target.1, tile.1))
}

/// `dim * k`, truncated, never below one pixel.
pub fn scaled_dimension(dim: u32, k: f32) -> u32 {
    ((f64::from(dim) * f64::from(k)) as u32).max(1)
}
