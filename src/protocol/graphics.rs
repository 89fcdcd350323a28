//! # ESC/POS Raster Graphics
//!
//! This module implements the raster bit-image command (`GS v 0`) used to
//! print logos and the social-media glyph row.
//!
//! ## Coordinate System
//!
//! ```text
//! (0,0) ──────────────────────► X (horizontal, 384 or 576 dots max)
//!   │
//!   │   ████████  ← Each dot is ~0.125mm (203 DPI)
//!   │   ████████
//!   ▼
//!   Y (vertical, paper feed direction)
//! ```
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```
//!
//! The protocol has no checksum: a header that disagrees with the body
//! length makes the printer consume the rest of the receipt as pixels.
//! [`RasterImage`] keeps the two in lock-step.

use super::commands::{GS, u16_le};

/// Length of the `GS v 0` preamble.
pub const RASTER_HEADER_LEN: usize = 8;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
/// | Decimal | 29 118 48 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Mode (0 = normal density, 1 dot per bit)
/// - `xL, xH`: Width in bytes, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height bytes
///
/// ## Example
///
/// ```
/// use tillprint::protocol::graphics::raster_header;
///
/// // 384 dots = 48 bytes wide, 100 rows
/// assert_eq!(
///     raster_header(48, 100),
///     [0x1D, 0x76, 0x30, 0x00, 48, 0, 100, 0]
/// );
/// ```
pub fn raster_header(width_bytes: u16, height: u16) -> [u8; RASTER_HEADER_LEN] {
    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);
    [GS, b'v', b'0', 0, xl, xh, yl, yh]
}

/// A packed monochrome bitmap with its matching `GS v 0` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    header: [u8; RASTER_HEADER_LEN],
    body: Vec<u8>,
    width_dots: u16,
}

impl RasterImage {
    /// Wrap packed row data.
    ///
    /// Returns `None` when `body` is not exactly `ceil(width_dots/8) × height`
    /// bytes, or when either dimension is zero.
    pub fn new(width_dots: u16, height: u16, body: Vec<u8>) -> Option<Self> {
        let width_bytes = width_dots.div_ceil(8);
        if width_dots == 0 || height == 0 || body.len() != width_bytes as usize * height as usize {
            return None;
        }
        Some(Self {
            header: raster_header(width_bytes, height),
            body,
            width_dots,
        })
    }

    pub fn header(&self) -> &[u8; RASTER_HEADER_LEN] {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn width_dots(&self) -> u16 {
        self.width_dots
    }

    /// Width in bytes, decoded from the header.
    pub fn x_bytes(&self) -> u16 {
        u16::from_le_bytes([self.header[4], self.header[5]])
    }

    /// Height in dots, decoded from the header.
    pub fn y_bits(&self) -> u16 {
        u16::from_le_bytes([self.header[6], self.header[7]])
    }

    /// Whether the dot at (x, y) is printed.
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        let width_bytes = self.x_bytes() as usize;
        let byte = self.body[y * width_bytes + x / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    /// The full command: header followed by body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + self.body.len());
        cmd.extend_from_slice(&self.header);
        cmd.extend_from_slice(&self.body);
        cmd
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let header = raster_header(72, 100);
        assert_eq!(header[0], 0x1D); // GS
        assert_eq!(header[1], 0x76); // 'v'
        assert_eq!(header[2], 0x30); // '0'
        assert_eq!(header[3], 0); // m = normal
        assert_eq!(header[4], 72); // xL
        assert_eq!(header[5], 0); // xH
        assert_eq!(header[6], 100); // yL
        assert_eq!(header[7], 0); // yH
    }

    #[test]
    fn test_raster_large_height() {
        // 500 = 0x01F4 -> [0xF4, 0x01] in little-endian
        let header = raster_header(48, 500);
        assert_eq!(header[6], 0xF4);
        assert_eq!(header[7], 0x01);
    }

    #[test]
    fn test_image_rejects_length_mismatch() {
        assert!(RasterImage::new(16, 2, vec![0; 3]).is_none());
        assert!(RasterImage::new(0, 2, vec![]).is_none());
        assert!(RasterImage::new(16, 0, vec![]).is_none());
    }

    #[test]
    fn test_image_width_rounding() {
        // 12 dots round up to 2 bytes
        let image = RasterImage::new(12, 3, vec![0xFF; 6]).unwrap();
        assert_eq!(image.x_bytes(), 2);
        assert_eq!(image.y_bits(), 3);
        assert_eq!(image.body().len(), 6);
    }

    #[test]
    fn test_to_bytes_preserves_data() {
        let body: Vec<u8> = (0..48 * 10).map(|i| (i % 256) as u8).collect();
        let image = RasterImage::new(384, 10, body.clone()).unwrap();
        let bytes = image.to_bytes();
        assert_eq!(bytes.len(), 8 + 48 * 10);
        assert_eq!(&bytes[..8], image.header());
        assert_eq!(&bytes[8..], &body[..]);
    }

    #[test]
    fn test_is_black() {
        let image = RasterImage::new(8, 1, vec![0b1000_0001]).unwrap();
        assert!(image.is_black(0, 0));
        assert!(!image.is_black(1, 0));
        assert!(image.is_black(7, 0));
    }
}
