//! Watermark rendering options.
//!
//! Defaults match the production catalog run: five repetitions of the mark,
//! 500px type in a blue ink, rotated 30 degrees on a 5x canvas and blended
//! at 20%.

use crate::{Result, WatermarkError};

/// Default watermark text.
pub const DEFAULT_TEXT: &str = "HBIS HBIS HBIS HBIS HBIS";

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 500.0;

/// Default ink, packed as `r + g * 256 + b * 256 * 256`.
pub const DEFAULT_INK: u32 = 112 * 256 + 199 * 256 * 256;

/// Default counter-clockwise rotation in degrees.
pub const DEFAULT_ROTATION_DEGREES: f32 = 30.0;

/// Default ratio between scratch canvas and source dimensions.
pub const DEFAULT_OVERSAMPLING: f32 = 5.0;

/// Default blend weight of the watermark layer.
pub const DEFAULT_OPACITY: f32 = 0.2;

/// RGB ink color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Ink {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a packed 24-bit color (red in the low byte, blue in the high byte).
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: ((packed >> 16) & 0xFF) as u8,
        }
    }

    pub const fn to_packed(self) -> u32 {
        self.r as u32 | (self.g as u32) << 8 | (self.b as u32) << 16
    }

    /// Grey level used when drawing on single-channel canvases (ITU-R 601).
    pub fn luma(self) -> u8 {
        let y = 0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b);
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl Default for Ink {
    fn default() -> Self {
        Self::from_packed(DEFAULT_INK)
    }
}

/// Configuration options for a watermark pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Text rendered on the scratch canvas.
    pub text: String,

    /// Font size in pixels.
    pub font_size: f32,

    /// Text color.
    pub ink: Ink,

    /// Counter-clockwise rotation applied to the whole canvas.
    pub rotation_degrees: f32,

    /// Scratch canvas size as a multiple of the source size (k). Must be >= 1.
    pub oversampling: f32,

    /// Blend weight of the watermark layer (0 = source, 1 = watermark layer).
    pub opacity: f32,

    /// Extra pixels added above the crop box. Legacy output used 50.
    pub vertical_bias: u32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.into(),
            font_size: DEFAULT_FONT_SIZE,
            ink: Ink::default(),
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            oversampling: DEFAULT_OVERSAMPLING,
            opacity: DEFAULT_OPACITY,
            vertical_bias: 0,
        }
    }
}

impl WatermarkOptions {
    /// Create options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the watermark text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set the font size.
    pub fn with_font_size(mut self, val: f32) -> Self {
        self.font_size = val;
        self
    }

    /// Builder: set the ink color.
    pub fn with_ink(mut self, ink: Ink) -> Self {
        self.ink = ink;
        self
    }

    /// Builder: set the rotation angle.
    pub fn with_rotation_degrees(mut self, val: f32) -> Self {
        self.rotation_degrees = val;
        self
    }

    /// Builder: set the oversampling factor.
    pub fn with_oversampling(mut self, val: f32) -> Self {
        self.oversampling = val;
        self
    }

    /// Builder: set the blend opacity.
    pub fn with_opacity(mut self, val: f32) -> Self {
        self.opacity = val;
        self
    }

    /// Builder: set the crop box top bias.
    pub fn with_vertical_bias(mut self, val: u32) -> Self {
        self.vertical_bias = val;
        self
    }

    /// Check that every field is usable for rendering.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(WatermarkError::InvalidOptions("text must not be empty".into()));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(WatermarkError::InvalidOptions(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(WatermarkError::InvalidOptions("rotation must be finite".into()));
        }
        if !(self.oversampling.is_finite() && self.oversampling >= 1.0) {
            return Err(WatermarkError::InvalidOptions(format!(
                "oversampling must be at least 1.0, got {}",
                self.oversampling
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::InvalidOptions(format!(
                "opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}
