//! Single-image watermark compositor.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, ImageBuffer, ImageDecoder, ImageFormat, ImageReader};
use tracing::{debug, info};

use crate::compose::{blend, crop, paste_centered};
use crate::format::{CanvasPixel, PixelFormat, stored_color_type};
use crate::geometry::{crop_box, crop_size, scaled_dimension};
use crate::options::WatermarkOptions;
use crate::rotate::rotate_canvas;
use crate::text::{blank_canvas, draw_centered_text};
use crate::{Result, WatermarkError};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub container: ImageFormat,
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Bytes written back to disk. `None` in dry-run mode.
    pub bytes_written: Option<usize>,
}

/// Applies one watermark configuration to any number of images.
pub struct Watermarker {
    font: FontVec,
    options: WatermarkOptions,
}

impl Watermarker {
    /// Create a compositor after validating `options`.
    pub fn new(font: FontVec, options: WatermarkOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { font, options })
    }

    /// Watermark a decoded image. Output keeps the source size and color type.
    pub fn apply(&self, img: &DynamicImage) -> Result<DynamicImage> {
        match img {
            DynamicImage::ImageRgb8(buf) => Ok(DynamicImage::ImageRgb8(self.composite(buf)?)),
            DynamicImage::ImageRgba8(buf) => Ok(DynamicImage::ImageRgba8(self.composite(buf)?)),
            DynamicImage::ImageLuma8(buf) => Ok(DynamicImage::ImageLuma8(self.composite(buf)?)),
            other => Err(WatermarkError::UnsupportedFormat(other.color().into())),
        }
    }

    fn composite<P: CanvasPixel>(
        &self,
        src: &ImageBuffer<P, Vec<u8>>,
    ) -> Result<ImageBuffer<P, Vec<u8>>> {
        let opts = &self.options;
        let (width, height) = src.dimensions();
        let canvas_w = scaled_dimension(width, opts.oversampling);
        let canvas_h = scaled_dimension(height, opts.oversampling);
        debug!(
            width,
            height,
            canvas_w,
            canvas_h,
            pixel_format = ?P::FORMAT,
            "Allocating watermark canvas"
        );

        let mut canvas = blank_canvas::<P>(canvas_w, canvas_h);
        let scale = PxScale::from(opts.font_size);
        let (text_w, text_h) =
            draw_centered_text(&mut canvas, &self.font, scale, &opts.text, P::ink(opts.ink));

        let rotated = rotate_canvas(&canvas, opts.rotation_degrees);
        drop(canvas);

        let size = crop_size(
            f64::from(text_w),
            f64::from(text_h),
            f64::from(opts.rotation_degrees),
        );
        let rect = crop_box(canvas_w, canvas_h, size, opts.vertical_bias);
        debug!(text_w, text_h, ?size, ?rect, "Cropping rotated text block");
        let tile = crop(&rotated, rect);

        let layer = paste_centered(width, height, &tile);
        blend(src, &layer, opts.opacity)
    }

    /// Watermark a file in place, keeping its container format.
    ///
    /// The result is fully encoded before the file is overwritten. With
    /// `dry_run` set nothing is written.
    pub fn watermark_file(&self, path: &Path, dry_run: bool) -> Result<FileOutcome> {
        let io_err = |source| WatermarkError::Io {
            path: path.to_path_buf(),
            source,
        };

        let bytes = std::fs::read(path).map_err(io_err)?;
        let mut reader = ImageReader::new(Cursor::new(bytes.as_slice()));
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
        let reader = reader.with_guessed_format().map_err(io_err)?;
        let container = reader.format();
        let decode_err = |source| WatermarkError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let decoder = reader.into_decoder().map_err(decode_err)?;
        let stored = stored_color_type(container, &bytes, decoder.original_color_type());
        let pixel_format = PixelFormat::from_original(stored)?;
        let img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        let container = container.ok_or_else(|| WatermarkError::UnknownContainer {
            path: path.to_path_buf(),
        })?;

        let (width, height) = (img.width(), img.height());
        let out = self.apply(&img)?;

        let mut buf = Cursor::new(Vec::new());
        out.write_to(&mut buf, container)
            .map_err(|source| WatermarkError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        let bytes = buf.into_inner();

        let bytes_written = if dry_run {
            debug!(path = %path.display(), "Dry run, not writing");
            None
        } else {
            std::fs::write(path, &bytes).map_err(io_err)?;
            Some(bytes.len())
        };

        info!(
            path = %path.display(),
            ?container,
            ?pixel_format,
            width,
            height,
            "Watermarked image"
        );

        Ok(FileOutcome {
            path: path.to_path_buf(),
            container,
            pixel_format,
            width,
            height,
            bytes_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayAlphaImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    const FONT_DATA: &[u8] = include_bytes!("../tests/fonts/DejaVuSans.ttf");

    fn watermarker(options: WatermarkOptions) -> Watermarker {
        let font = FontVec::try_from_vec(FONT_DATA.to_vec()).unwrap();
        Watermarker::new(font, options).unwrap()
    }

    fn small_options() -> WatermarkOptions {
        WatermarkOptions::new().with_font_size(80.0).with_oversampling(1.5)
    }

    #[test]
    fn rejects_invalid_options() {
        let font = FontVec::try_from_vec(FONT_DATA.to_vec()).unwrap();
        let opts = WatermarkOptions::new().with_opacity(-0.1);
        assert!(Watermarker::new(font, opts).is_err());
    }

    #[test]
    fn keeps_dimensions_and_format_for_every_supported_type() {
        let wm = watermarker(small_options());
        let inputs = [
            DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([255, 255, 255]))),
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 97, Rgba([10, 20, 30, 255]))),
            DynamicImage::ImageLuma8(GrayImage::from_pixel(33, 200, Luma([128]))),
        ];
        for img in &inputs {
            let out = wm.apply(img).unwrap();
            assert_eq!(out.dimensions(), img.dimensions());
            assert_eq!(out.color(), img.color());
        }
    }

    #[test]
    fn zero_opacity_is_identity() {
        let wm = watermarker(small_options().with_opacity(0.0));
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(50, 40, |x, y| {
            Rgb([x as u8, y as u8, (x * y % 256) as u8])
        }));
        assert_eq!(wm.apply(&img).unwrap(), img);
    }

    #[test]
    fn full_opacity_on_white_shows_ink() {
        let wm = watermarker(small_options().with_opacity(1.0));
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 100, Luma([255])));
        let out = wm.apply(&img).unwrap().to_luma8();
        assert!(out.pixels().any(|p| p[0] < 200));
    }

    #[test]
    fn grey_alpha_is_unsupported() {
        let wm = watermarker(small_options());
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::new(10, 10));
        assert!(matches!(
            wm.apply(&img),
            Err(WatermarkError::UnsupportedFormat(image::ExtendedColorType::La8))
        ));
    }

    #[test]
    fn vertical_bias_keeps_output_size() {
        let wm = watermarker(small_options().with_vertical_bias(50));
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
        assert_eq!(wm.apply(&img).unwrap().dimensions(), (100, 100));
    }

    #[test]
    fn watermark_file_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])).save(&path).unwrap();

        let wm = watermarker(small_options());
        let outcome = wm.watermark_file(&path, false).unwrap();
        assert_eq!(outcome.container, ImageFormat::Png);
        assert_eq!(outcome.pixel_format, PixelFormat::Rgb);
        assert!(outcome.bytes_written.is_some());

        let reread = image::open(&path).unwrap();
        assert_eq!(reread.dimensions(), (100, 100));
        assert!(reread.to_rgb8().pixels().any(|p| *p != Rgb([255, 255, 255])));
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        GrayImage::from_pixel(40, 40, Luma([255])).save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let wm = watermarker(small_options());
        let outcome = wm.watermark_file(&path, true).unwrap();
        assert_eq!(outcome.bytes_written, None);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn container_follows_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actually_png.jpg");
        RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let wm = watermarker(small_options());
        let outcome = wm.watermark_file(&path, false).unwrap();
        assert_eq!(outcome.container, ImageFormat::Png);
        let reread = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
        assert_eq!(reread.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn palette_png_is_unsupported_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.png");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 40, 40);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255u8, 255, 255, 0, 112, 199]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0u8; 40 * 40]).unwrap();
            writer.finish().unwrap();
        }
        let before = std::fs::read(&path).unwrap();

        let wm = watermarker(small_options());
        assert!(matches!(
            wm.watermark_file(&path, false),
            Err(WatermarkError::UnsupportedFormat(image::ExtendedColorType::Unknown(8)))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn gif_is_unsupported_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]))
            .save_with_format(&path, ImageFormat::Gif)
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let wm = watermarker(small_options());
        assert!(matches!(
            wm.watermark_file(&path, false),
            Err(WatermarkError::UnsupportedFormat(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn undecodable_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# not an image").unwrap();

        let wm = watermarker(small_options());
        assert!(matches!(
            wm.watermark_file(&path, false),
            Err(WatermarkError::Decode { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# not an image");
    }
}
