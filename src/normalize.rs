//! Image normalization: rescale any bitmap to the canonical size class.

use crate::{MicrographyError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Target width for landscape images.
pub const LANDSCAPE_WIDTH: u32 = 330;
/// Target height for portrait and square images.
pub const PORTRAIT_HEIGHT: u32 = 300;

/// A decoded input bitmap.
#[derive(Debug, Clone)]
pub struct SourceImage(DynamicImage);

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        Self(image)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        image::open(path)
            .map(Self)
            .map_err(|e| MicrographyError::ImageDecode(format!("{}: {e}", path.display())))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        image::load_from_memory(bytes)
            .map(Self)
            .map_err(|e| MicrographyError::ImageDecode(e.to_string()))
    }

    /// Wrap raw RGBA8 pixels, as handed over by a browser canvas.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        image::RgbaImage::from_raw(width, height, data)
            .map(|img| Self(DynamicImage::ImageRgba8(img)))
            .ok_or_else(|| {
                MicrographyError::ImageDecode(format!(
                    "pixel buffer does not match {width}x{height} RGBA"
                ))
            })
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }
}

/// Dimensions a `width`×`height` image is rescaled to.
///
/// Landscape images get width 330, everything else height 300; the other
/// edge keeps the aspect ratio, rounded to the nearest pixel and at least 1.
pub fn normalized_size(width: u32, height: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(MicrographyError::ImageDecode(format!(
            "image has zero area ({width}x{height})"
        )));
    }
    let scale = |edge: u32, num: u32, den: u32| {
        ((edge as f64 * num as f64 / den as f64).round() as u32).max(1)
    };
    Ok(if width > height {
        (LANDSCAPE_WIDTH, scale(height, LANDSCAPE_WIDTH, width))
    } else {
        (scale(width, PORTRAIT_HEIGHT, height), PORTRAIT_HEIGHT)
    })
}

/// Rescale with Lanczos3 so colour sampling downstream is not aliased.
pub fn normalize_image(source: &SourceImage) -> Result<RgbImage> {
    let (w, h) = normalized_size(source.width(), source.height())?;
    let rgb = source.0.to_rgb8();
    if (w, h) == rgb.dimensions() {
        return Ok(rgb);
    }
    Ok(image::imageops::resize(&rgb, w, h, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn landscape_scales_to_width() {
        assert_eq!(normalized_size(400, 200).unwrap(), (330, 165));
        // 1000x333 -> 109.89 rounds up
        assert_eq!(normalized_size(1000, 333).unwrap(), (330, 110));
    }

    #[test]
    fn portrait_and_square_scale_to_height() {
        assert_eq!(normalized_size(100, 300).unwrap(), (100, 300));
        assert_eq!(normalized_size(200, 600).unwrap(), (100, 300));
        assert_eq!(normalized_size(50, 50).unwrap(), (300, 300));
    }

    #[test]
    fn thin_images_keep_one_pixel() {
        assert_eq!(normalized_size(5000, 1).unwrap(), (330, 1));
    }

    #[test]
    fn zero_area_is_rejected() {
        assert!(matches!(normalized_size(0, 10), Err(MicrographyError::ImageDecode(_))));
        assert!(matches!(normalized_size(10, 0), Err(MicrographyError::ImageDecode(_))));
    }

    #[test]
    fn resizes_pixels() {
        let img = RgbImage::from_pixel(400, 200, Rgb([10, 20, 30]));
        let out = normalize_image(&SourceImage::new(DynamicImage::ImageRgb8(img))).unwrap();
        assert_eq!(out.dimensions(), (330, 165));
        let p = out.get_pixel(100, 100);
        assert!(p.0.iter().zip([10u8, 20, 30]).all(|(a, b)| a.abs_diff(b) <= 1));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            SourceImage::decode(b"not an image"),
            Err(MicrographyError::ImageDecode(_))
        ));
    }

    #[test]
    fn rgba_buffer_must_match_dimensions() {
        assert!(SourceImage::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            SourceImage::from_rgba(vec![0; 15], 2, 2),
            Err(MicrographyError::ImageDecode(_))
        ));
    }
}
