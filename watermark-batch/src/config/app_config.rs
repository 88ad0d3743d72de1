//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Context;
use watermark_engine::options::{
    DEFAULT_FONT_SIZE, DEFAULT_INK, DEFAULT_OPACITY, DEFAULT_OVERSAMPLING,
    DEFAULT_ROTATION_DEGREES, DEFAULT_TEXT,
};
use watermark_engine::{Ink, WatermarkOptions};

use super::validation::validate_setting;

/// Font file name used when `WATERMARK_FONT` is not set.
pub const DEFAULT_FONT: &str = "Arial.ttf";

/// Runtime configuration for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub root_dir: Option<PathBuf>,
    pub font: String,
    pub font_dirs: Vec<PathBuf>,
    pub text: String,
    pub font_size: f32,
    pub ink: u32,
    pub rotation_degrees: f32,
    pub oversampling: f32,
    pub opacity: f32,
    pub vertical_bias: u32,
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_dir: None,
            font: DEFAULT_FONT.into(),
            font_dirs: Vec::new(),
            text: DEFAULT_TEXT.into(),
            font_size: DEFAULT_FONT_SIZE,
            ink: DEFAULT_INK,
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            oversampling: DEFAULT_OVERSAMPLING,
            opacity: DEFAULT_OPACITY,
            vertical_bias: 0,
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset or empty keys keep their defaults. Set keys must validate.
    pub fn load_with<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> Result<Option<String>, anyhow::Error> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => {
                    validate_setting(key, &v)
                        .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
                    Ok(Some(v))
                }
                _ => Ok(None),
            }
        };

        let mut config = Self::default();

        if let Some(v) = g("WATERMARK_ROOT_DIR")? {
            config.root_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = g("WATERMARK_FONT")? {
            config.font = v;
        }
        if let Some(v) = g("WATERMARK_FONT_DIRS")? {
            config.font_dirs = std::env::split_paths(&v).collect();
        }
        if let Some(v) = g("WATERMARK_TEXT")? {
            config.text = v;
        }
        if let Some(v) = g("WATERMARK_FONT_SIZE")? {
            config.font_size = parse(&v, "WATERMARK_FONT_SIZE")?;
        }
        if let Some(v) = g("WATERMARK_INK")? {
            config.ink = parse_ink(&v).context("WATERMARK_INK")?;
        }
        if let Some(v) = g("WATERMARK_ROTATION")? {
            config.rotation_degrees = parse(&v, "WATERMARK_ROTATION")?;
        }
        if let Some(v) = g("WATERMARK_OVERSAMPLING")? {
            config.oversampling = parse(&v, "WATERMARK_OVERSAMPLING")?;
        }
        if let Some(v) = g("WATERMARK_OPACITY")? {
            config.opacity = parse(&v, "WATERMARK_OPACITY")?;
        }
        if let Some(v) = g("WATERMARK_VERTICAL_BIAS")? {
            config.vertical_bias = parse(&v, "WATERMARK_VERTICAL_BIAS")?;
        }
        if let Some(v) = g("WATERMARK_DRY_RUN")? {
            config.dry_run = v == "true";
        }

        Ok(config)
    }

    /// Rendering options for the compositor.
    pub fn watermark_options(&self) -> WatermarkOptions {
        WatermarkOptions::new()
            .with_text(self.text.clone())
            .with_font_size(self.font_size)
            .with_ink(Ink::from_packed(self.ink))
            .with_rotation_degrees(self.rotation_degrees)
            .with_oversampling(self.oversampling)
            .with_opacity(self.opacity)
            .with_vertical_bias(self.vertical_bias)
    }

    /// Directories searched for the font after the working directory.
    pub fn font_search_dirs(&self) -> Vec<PathBuf> {
        let mut search = self.font_dirs.clone();
        if let Some(user_fonts) = dirs::font_dir() {
            search.push(user_fonts);
        }
        search
    }
}

fn parse<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, anyhow::Error> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("failed to parse {key}: {value:?}"))
}

/// Parse `#RRGGBB` or a packed decimal color into the packed form.
fn parse_ink(value: &str) -> Result<u32, anyhow::Error> {
    if let Some(hex) = value.strip_prefix('#') {
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let ink = Ink::new(channel(0)?, channel(2)?, channel(4)?);
        return Ok(ink.to_packed());
    }
    Ok(value.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, anyhow::Error> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load_with(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.watermark_options(), WatermarkOptions::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("WATERMARK_ROOT_DIR", "/data/cct"),
            ("WATERMARK_FONT", "DejaVuSans.ttf"),
            ("WATERMARK_TEXT", "DRAFT"),
            ("WATERMARK_FONT_SIZE", "80"),
            ("WATERMARK_INK", "#FF0000"),
            ("WATERMARK_OVERSAMPLING", "1.5"),
            ("WATERMARK_OPACITY", "0.35"),
            ("WATERMARK_VERTICAL_BIAS", "50"),
            ("WATERMARK_DRY_RUN", "true"),
        ])
        .unwrap();

        assert_eq!(config.root_dir, Some(PathBuf::from("/data/cct")));
        assert_eq!(config.font, "DejaVuSans.ttf");
        assert_eq!(config.ink, 0xFF);
        assert!(config.dry_run);

        let opts = config.watermark_options();
        assert_eq!(opts.text, "DRAFT");
        assert_eq!(opts.ink, Ink::new(255, 0, 0));
        assert!((opts.oversampling - 1.5).abs() < f32::EPSILON);
        assert!((opts.opacity - 0.35).abs() < f32::EPSILON);
        assert_eq!(opts.vertical_bias, 50);
    }

    #[test]
    fn packed_ink_matches_default() {
        let config = load(&[("WATERMARK_INK", "13070336")]).unwrap();
        assert_eq!(Ink::from_packed(config.ink), Ink::new(0, 112, 199));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = load(&[("WATERMARK_TEXT", "  "), ("WATERMARK_OPACITY", "")]).unwrap();
        assert_eq!(config.text, DEFAULT_TEXT);
        assert!((config.opacity - DEFAULT_OPACITY).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = load(&[("WATERMARK_OPACITY", "2.0")]).unwrap_err();
        assert!(err.to_string().contains("WATERMARK_OPACITY"));
    }

    #[test]
    fn font_search_dirs_keep_configured_order() {
        let config = load(&[("WATERMARK_FONT_DIRS", "/opt/fonts")]).unwrap();
        let dirs = config.font_search_dirs();
        assert_eq!(dirs[0], PathBuf::from("/opt/fonts"));
    }
}
