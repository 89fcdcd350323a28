//! # Monochrome Image Rasterizer
//!
//! Converts an arbitrary bitmap (a shop logo, the composed social row) into
//! a packed 1-bit raster sized to the printer's dot width.
//!
//! ## Pipeline
//!
//! ```text
//! source ──► scale to target width ──► flatten on white ──► luminance ──► threshold ──► pack
//!            (aspect preserved)         (alpha → white)      0.299R+...    < 128 = black  MSB first
//! ```
//!
//! No dithering: gradients collapse to solid black or white.

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use tracing::{debug, warn};

use super::host::ImageDecoder;
use crate::protocol::RasterImage;

/// Luminance below this prints black.
pub const THRESHOLD: f32 = 128.0;

/// Perceptual luminance of an sRGB pixel (ITU-R BT.601 weights).
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Composite one channel over a white background.
#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((channel as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Pack a row of boolean pixels into bytes (MSB = leftmost).
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ## Example
///
/// ```
/// use tillprint::render::raster::pack_row;
///
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

/// Height that keeps the source aspect ratio at `target_width`.
fn scaled_height(src_width: u32, src_height: u32, target_width: u32) -> u32 {
    let h = (src_height as f64 * target_width as f64 / src_width as f64).round() as u32;
    h.max(1)
}

/// # Rasterize an Image
///
/// Scales `source` to exactly `target_width_dots` wide (height follows the
/// aspect ratio), flattens transparency onto white, and thresholds each
/// pixel's luminance against [`THRESHOLD`].
///
/// Returns `None` for empty sources, a zero target width, or a result taller
/// than the raster header can express. Callers treat `None` as "skip this
/// image", never as a printing failure.
pub fn rasterize(source: &DynamicImage, target_width_dots: u16) -> Option<RasterImage> {
    let (src_w, src_h) = (source.width(), source.height());
    if target_width_dots == 0 || src_w == 0 || src_h == 0 {
        warn!(src_w, src_h, target_width_dots, "cannot rasterize empty image");
        return None;
    }

    let target_w = target_width_dots as u32;
    let target_h = scaled_height(src_w, src_h, target_w);
    if target_h > u16::MAX as u32 {
        warn!(target_h, "rasterized image too tall for raster header");
        return None;
    }

    let canvas: RgbaImage = if (src_w, src_h) == (target_w, target_h) {
        source.to_rgba8()
    } else {
        source
            .resize_exact(target_w, target_h, FilterType::Triangle)
            .to_rgba8()
    };

    let mut body = Vec::with_capacity(target_w.div_ceil(8) as usize * target_h as usize);
    let mut row = Vec::with_capacity(target_w as usize);
    for y in 0..target_h {
        row.clear();
        for x in 0..target_w {
            let [r, g, b, a] = canvas.get_pixel(x, y).0;
            let lum = luminance(over_white(r, a), over_white(g, a), over_white(b, a));
            row.push(lum < THRESHOLD);
        }
        body.extend(pack_row(&row));
    }

    debug!(width = target_w, height = target_h, "rasterized image");
    RasterImage::new(target_width_dots, target_h as u16, body)
}

/// Decode `bytes` with `decoder`, then [`rasterize`].
///
/// A decode failure is logged and returns `None`.
pub fn rasterize_bytes<D: ImageDecoder + ?Sized>(
    bytes: &[u8],
    target_width_dots: u16,
    decoder: &D,
) -> Option<RasterImage> {
    match decoder.decode_image(bytes) {
        Ok(image) => rasterize(&image, target_width_dots),
        Err(e) => {
            warn!(error = %e, "image decode failed, skipping");
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
