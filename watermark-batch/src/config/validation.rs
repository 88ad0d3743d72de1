//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static RE_PACKED_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,8}$").unwrap());

/// Largest packed 24-bit color.
pub const MAX_PACKED_INK: u32 = 0xFF_FFFF;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "WATERMARK_ROOT_DIR" | "WATERMARK_FONT" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        "WATERMARK_TEXT" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
            if value.chars().count() > 256 {
                return Err("must be at most 256 characters".into());
            }
        }
        "WATERMARK_FONT_SIZE" => validate_float_range(value, 1.0, 4096.0)?,
        "WATERMARK_ROTATION" => validate_float_range(value, -360.0, 360.0)?,
        "WATERMARK_OVERSAMPLING" => validate_float_range(value, 1.0, 16.0)?,
        "WATERMARK_OPACITY" => validate_float_range(value, 0.0, 1.0)?,
        "WATERMARK_VERTICAL_BIAS" => {
            let v: u32 = value.parse().map_err(|_| "must be a non-negative integer")?;
            if v > 10_000 {
                return Err("must be at most 10000 pixels".into());
            }
        }
        "WATERMARK_INK" => {
            if RE_HEX_COLOR.is_match(value) {
                return Ok(());
            }
            if !RE_PACKED_COLOR.is_match(value) {
                return Err("expected #RRGGBB or a packed decimal color".into());
            }
            let v: u32 = value.parse().map_err(|_| "must be an integer")?;
            if v > MAX_PACKED_INK {
                return Err(format!("packed color must be at most {MAX_PACKED_INK}"));
            }
        }
        "WATERMARK_DRY_RUN" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_float_range(value: &str, min: f64, max: f64) -> Result<(), String> {
    let v: f64 = value.parse().map_err(|_| "must be a number")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
