//! Rendering host capabilities.
//!
//! The rasterizer and glyph compositor only need three things from the
//! platform: decode an image, measure a string, and draw text/icons onto an
//! RGBA canvas. Keeping those behind traits lets the layout and thresholding
//! logic run (and be tested) without any real rendering backend.
//!
//! [`SpleenHost`] is the built-in implementation: the `image` crate for
//! decoding and the Spleen 12×24 bitmap font, which matches the printer's
//! own Font A cell size.

use image::{DynamicImage, Rgba, RgbaImage};
use spleen_font::{FONT_12X24, PSF2Font};

use super::icons::{SocialIcon, icon_mask};
use crate::error::TillprintError;

/// Glyph cell width of the Spleen 12×24 font.
pub const CHAR_WIDTH: u32 = 12;
/// Glyph cell height of the Spleen 12×24 font.
pub const CHAR_HEIGHT: u32 = 24;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Decodes encoded image bytes (PNG, JPEG, GIF, WebP, ...).
pub trait ImageDecoder: Send + Sync {
    fn decode_image(&self, bytes: &[u8]) -> Result<DynamicImage, TillprintError>;
}

/// Measures rendered text width in dots.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str) -> u32;
}

/// Everything the glyph compositor needs to paint a row.
pub trait GlyphHost: ImageDecoder + TextMeasurer {
    /// Draw `text` starting at `x`, vertically centered on `center_y`.
    fn draw_text(&self, canvas: &mut RgbaImage, text: &str, x: i32, center_y: i32);

    /// Draw a `size`×`size` icon with its top-left corner at (x, y).
    fn draw_icon(&self, canvas: &mut RgbaImage, icon: SocialIcon, x: i32, y: i32, size: u32);
}

/// Default host backed by the `image` crate and the Spleen bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpleenHost;

impl SpleenHost {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for SpleenHost {
    fn decode_image(&self, bytes: &[u8]) -> Result<DynamicImage, TillprintError> {
        image::load_from_memory(bytes)
            .map_err(|e| TillprintError::Image(format!("Failed to decode image: {}", e)))
    }
}

impl TextMeasurer for SpleenHost {
    fn measure_text(&self, text: &str) -> u32 {
        text.chars().count() as u32 * CHAR_WIDTH
    }
}

impl GlyphHost for SpleenHost {
    fn draw_text(&self, canvas: &mut RgbaImage, text: &str, x: i32, center_y: i32) {
        let Ok(mut font) = PSF2Font::new(FONT_12X24) else {
            return;
        };
        let top = center_y - (CHAR_HEIGHT / 2) as i32;

        for (i, ch) in text.chars().enumerate() {
            let left = x + (i as u32 * CHAR_WIDTH) as i32;
            let utf8 = ch.to_string();
            let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
                continue;
            };
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if on {
                        put(canvas, left + col_x as i32, top + row_y as i32);
                    }
                }
            }
        }
    }

    fn draw_icon(&self, canvas: &mut RgbaImage, icon: SocialIcon, x: i32, y: i32, size: u32) {
        let mask = icon_mask(icon, size);
        for py in 0..size {
            for px in 0..size {
                if mask[(py * size + px) as usize] {
                    put(canvas, x + px as i32, y + py as i32);
                }
            }
        }
    }
}

/// Set a black pixel, clipping to the canvas.
fn put(canvas: &mut RgbaImage, x: i32, y: i32) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn black_count(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p.0[0] == 0).count()
    }

    #[test]
    fn test_measure_is_monospace() {
        let host = SpleenHost::new();
        assert_eq!(host.measure_text(""), 0);
        assert_eq!(host.measure_text("@cafe"), 60);
        assert_eq!(host.measure_text("é"), 12);
    }

    #[test]
    fn test_draw_text_marks_pixels_inside_bounds() {
        let host = SpleenHost::new();
        let mut canvas = white(120, 32);
        host.draw_text(&mut canvas, "Hi", 4, 16);
        assert!(black_count(&canvas) > 0);
        // Nothing drawn right of the two glyph cells
        for y in 0..32 {
            for x in 28..120 {
                assert_eq!(canvas.get_pixel(x, y).0[0], 255);
            }
        }
    }

    #[test]
    fn test_draw_text_clips() {
        let host = SpleenHost::new();
        let mut canvas = white(10, 10);
        host.draw_text(&mut canvas, "WWWW", -5, 0);
    }

    #[test]
    fn test_draw_icon() {
        let host = SpleenHost::new();
        let mut canvas = white(24, 24);
        host.draw_icon(&mut canvas, SocialIcon::Facebook, 0, 0, 24);
        assert!(black_count(&canvas) > 100);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SpleenHost::new().decode_image(&[0, 1, 2, 3]).is_err());
    }
}
