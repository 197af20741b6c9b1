//! Glyph grid rendering: one character of text per sampled pixel.
//!
//! The grid is walked row by row from the top, and within each row from the
//! right edge to the left, for every script. Every `density`-th pixel is a
//! grid point; it lands on the canvas at `point * CELL_SIZE / density`.

use crate::fonts::GLYPH_DRAW_SIZE;
use crate::text::NormalizedText;
use fontdue::Font;
use image::{Rgb, RgbImage};

/// Canvas pixels per grid cell.
pub const CELL_SIZE: u32 = 10;
/// Extra canvas pixels past the last cell, in both directions.
pub const CANVAS_MARGIN: u32 = 10;
pub const BACKGROUND: Rgb<u8> = Rgb([120, 120, 120]);

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const TRANSPARENT_OPACITY: f32 = 0.5;

/// Canvas dimensions for a `width`×`height` image sampled every `density` pixels.
pub fn canvas_size(width: u32, height: u32, density: u32) -> (u32, u32) {
    (
        width * CELL_SIZE / density + CANVAS_MARGIN,
        height * CELL_SIZE / density + CANVAS_MARGIN,
    )
}

/// Glyph colour for a sampled pixel. Pure white is drawn as black.
pub fn sample_color(pixel: Rgb<u8>) -> Rgb<u8> {
    if pixel == WHITE {
        BLACK
    } else {
        pixel
    }
}

/// Grid points in drawing order.
#[derive(Debug, Clone)]
pub struct GridWalk {
    width: u32,
    height: u32,
    step: u32,
    y: u32,
    // next x to visit in the current row, None once the row is exhausted
    x: Option<u32>,
}

impl GridWalk {
    /// `density` must be non-zero.
    pub fn new(width: u32, height: u32, density: u32) -> Self {
        debug_assert!(density > 0);
        Self { width, height, step: density, y: 0, x: width.checked_sub(1) }
    }
}

impl Iterator for GridWalk {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        loop {
            if self.y >= self.height {
                return None;
            }
            match self.x {
                Some(x) => {
                    self.x = x.checked_sub(self.step);
                    return Some((x, self.y));
                }
                None => {
                    self.y = self.y.saturating_add(self.step);
                    self.x = self.width.checked_sub(1);
                    if self.x.is_none() {
                        return None;
                    }
                }
            }
        }
    }
}

/// Anything glyphs can be drawn onto.
pub trait GlyphSink {
    /// Draw `glyph` with its top-left cell corner at canvas `(x, y)`.
    fn draw_glyph(&mut self, glyph: char, x: u32, y: u32, color: Rgb<u8>);
}

/// Walk the grid over `image`, drawing the `i`-th grid point with
/// `text[i mod len]`. Returns the number of glyphs drawn.
pub fn render_into<S: GlyphSink + ?Sized>(
    sink: &mut S,
    image: &RgbImage,
    text: &NormalizedText,
    density: u32,
) -> usize {
    let mut drawn = 0;
    for (index, (x, y)) in GridWalk::new(image.width(), image.height(), density).enumerate() {
        let color = sample_color(*image.get_pixel(x, y));
        sink.draw_glyph(
            text.cyclic(index),
            x * CELL_SIZE / density,
            y * CELL_SIZE / density,
            color,
        );
        drawn += 1;
    }
    drawn
}

/// Raster canvas drawing glyphs with a fontdue font.
pub struct Canvas<'f> {
    image: RgbImage,
    font: &'f Font,
    ascent: f32,
    opacity: f32,
}

impl<'f> Canvas<'f> {
    /// Blank canvas sized for a `width`×`height` normalized image.
    ///
    /// With `transparent_text` set, glyphs are blended at half opacity.
    pub fn new(width: u32, height: u32, density: u32, font: &'f Font, transparent_text: bool) -> Self {
        let (w, h) = canvas_size(width, height, density);
        let ascent = font
            .horizontal_line_metrics(GLYPH_DRAW_SIZE)
            .map(|m| m.ascent)
            .unwrap_or(GLYPH_DRAW_SIZE);
        let opacity = if transparent_text { TRANSPARENT_OPACITY } else { 1.0 };
        Self { image: RgbImage::from_pixel(w, h, BACKGROUND), font, ascent, opacity }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl GlyphSink for Canvas<'_> {
    fn draw_glyph(&mut self, glyph: char, x: u32, y: u32, color: Rgb<u8>) {
        let (metrics, bitmap) = self.font.rasterize(glyph, GLYPH_DRAW_SIZE);
        if metrics.width == 0 || metrics.height == 0 {
            return;
        }

        // Origin is the ascender line; fontdue measures ymin up from the baseline
        let baseline = y as f32 + self.ascent;
        let top = (baseline - (metrics.ymin as f32 + metrics.height as f32)).round() as i64;
        let left = x as i64 + metrics.xmin as i64;
        let (cw, ch) = (self.image.width() as i64, self.image.height() as i64);

        for gy in 0..metrics.height {
            let ty = top + gy as i64;
            if ty < 0 || ty >= ch {
                continue;
            }
            for gx in 0..metrics.width {
                let tx = left + gx as i64;
                if tx < 0 || tx >= cw {
                    continue;
                }
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                let alpha = coverage as f32 / 255.0 * self.opacity;
                let dst = self.image.get_pixel_mut(tx as u32, ty as u32);
                *dst = blend(*dst, color, alpha);
            }
        }
    }
}

fn blend(dst: Rgb<u8>, src: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |d: u8, s: u8| (d as f32 * (1.0 - alpha) + s as f32 * alpha).round() as u8;
    Rgb([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2])])
}
