//! # ESC/POS Text Styling and Column Layout
//!
//! Text styling commands plus the fixed-column helpers the receipt encoder
//! uses to fake a table on paper that has no table layout.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right |
//! | Bold | ESC E n | **Emphasized** text |
//! | Character size | GS ! n | Double width and/or height |
//!
//! ## Column Layout
//!
//! ```text
//! 58mm, 32 columns:
//! |Subtotal                  100.00|
//! |Service                   +10.00|
//! ```
//!
//! All widths are counted in `char`s. Text is sent as UTF-8; non-ASCII
//! characters are counted as one column each.

use super::commands::{ESC, GS};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Set Text Alignment (ESC a n)
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
/// | Decimal | 27 97 n  |
///
/// Alignment also applies to raster images, which is how logos get centered.
///
/// ## Example
///
/// ```
/// use tillprint::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

#[inline]
pub fn align_center() -> Vec<u8> {
    align(Alignment::Center)
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Bold On (ESC E 1)
///
/// | Hex | 1B 45 01 |
/// |-----|----------|
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 1]
}

/// # Bold Off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Select Character Size (GS ! n)
///
/// `n` packs the width multiplier in the high nibble and the height
/// multiplier in the low nibble, both zero-based:
///
/// ```text
/// 0x00 = normal
/// 0x01 = double height
/// 0x10 = double width
/// 0x11 = double width and height
/// ```
fn char_size(n: u8) -> Vec<u8> {
    vec![GS, b'!', n]
}

/// Double width and height (GS ! 0x11)
#[inline]
pub fn double_size_on() -> Vec<u8> {
    char_size(0x11)
}

/// Back to normal size (GS ! 0x00)
#[inline]
pub fn double_size_off() -> Vec<u8> {
    char_size(0x00)
}

/// Double height only (GS ! 0x01)
#[inline]
pub fn double_height_on() -> Vec<u8> {
    char_size(0x01)
}

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Keep the first `max_chars` characters of `s`. No ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// # Label/Value Line
///
/// Left-aligns `left` and right-aligns `right` within `width` columns.
///
/// When `right` is shorter than `width`, the result is exactly `width`
/// characters: `left` is truncated so at least one space separates the two,
/// then padded. When `right` alone fills the
/// line, it is truncated to `width` and `left` is dropped.
///
/// ## Example
///
/// ```
/// use tillprint::protocol::text::format_line;
///
/// assert_eq!(format_line("Total", "105.00", 16), "Total     105.00");
/// assert_eq!(format_line("Very long label", "9.00", 12), "Very lo 9.00");
/// ```
pub fn format_line(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    if right_len >= width {
        return truncate(right, width).to_string();
    }

    let room = width - right_len;
    // At least one space between label and value.
    let left = truncate(left, room - 1);
    let pad = room - left.chars().count();

    let mut line = String::with_capacity(width + 4);
    line.push_str(left);
    line.extend(std::iter::repeat_n(' ', pad));
    line.push_str(right);
    line
}

/// A full-width separator made of `ch`.
pub fn separator(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// Encode a text line (with trailing LF) for the printer.
pub fn line(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() + 1);
    out.extend_from_slice(s.as_bytes());
    out.push(super::commands::LF);
    out
}

// ============================================================================
// TESTS
// ============================================================================
