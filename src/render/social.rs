//! # Social-Media Glyph Row Compositor
//!
//! Lays out `(icon, label)` pairs such as `[f] @annapurna  [ig] @annapurna.cafe`
//! into centered rows that fit the printer's dot width, paints them onto an
//! offscreen canvas, and rasterizes the result.
//!
//! ## Layout
//!
//! Greedy line wrap in input order. An entry is `ICON_SIZE + ICON_PADDING +
//! text width` wide and entries on one row are separated by `ITEM_GAP`:
//!
//! ```text
//! ┌──────────────────────── target width ────────────────────────┐
//! │        [f] @cafe ·gap· [ig] @cafe.official                   │  row 0, start_x = (W - content0) / 2
//! │                 [wa] +91 98765 43210                         │  row 1, start_x = (W - content1) / 2
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each row is centered on its own. An entry wider than the target still
//! gets a row to itself and is clipped when painted.

use image::{Rgba, RgbaImage};
use tracing::debug;

use super::host::{GlyphHost, TextMeasurer};
use super::icons::SocialIcon;
use super::raster::rasterize;
use crate::protocol::RasterImage;
use crate::receipt::types::{ShopIdentity, non_blank};

/// Icon edge length in dots.
pub const ICON_SIZE: u32 = 24;
/// Space between an icon and its label.
pub const ICON_PADDING: u32 = 6;
/// Space between entries on the same row.
pub const ITEM_GAP: u32 = 16;
/// Height of one row band.
pub const ROW_HEIGHT: u32 = 32;

/// One icon/label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialEntry {
    pub icon: SocialIcon,
    pub label: String,
}

impl SocialEntry {
    pub fn new(icon: SocialIcon, label: impl Into<String>) -> Self {
        Self {
            icon,
            label: label.into(),
        }
    }
}

/// An entry positioned within its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedEntry {
    /// Index into the filtered entry list.
    pub index: usize,
    /// Left edge of the icon.
    pub x: u32,
    pub text_width: u32,
}

/// One laid-out row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub entries: Vec<PlacedEntry>,
    pub content_width: u32,
    pub start_x: u32,
}

/// Social entries for a shop, in facebook → instagram → whatsapp order.
pub fn shop_social_entries(shop: &ShopIdentity) -> Vec<SocialEntry> {
    [
        (SocialIcon::Facebook, &shop.facebook),
        (SocialIcon::Instagram, &shop.instagram),
        (SocialIcon::WhatsApp, &shop.whatsapp),
    ]
    .into_iter()
    .filter_map(|(icon, value)| non_blank(value).map(|label| SocialEntry::new(icon, label)))
    .collect()
}

/// Greedy row wrap and per-row centering.
///
/// Pure layout: no drawing, only `measurer` is consulted.
pub fn layout_rows<M: TextMeasurer + ?Sized>(
    entries: &[SocialEntry],
    target_width: u32,
    measurer: &M,
) -> Vec<RowLayout> {
    // (index, text width) per row
    let mut rows: Vec<Vec<(usize, u32)>> = Vec::new();
    let mut current: Vec<(usize, u32)> = Vec::new();
    let mut row_width = 0u32;

    for (index, entry) in entries.iter().enumerate() {
        let text_width = measurer.measure_text(&entry.label);
        let entry_width = ICON_SIZE + ICON_PADDING + text_width;
        let gap = if current.is_empty() { 0 } else { ITEM_GAP };

        if !current.is_empty() && row_width + gap + entry_width > target_width {
            rows.push(std::mem::take(&mut current));
            row_width = entry_width;
        } else {
            row_width += gap + entry_width;
        }
        current.push((index, text_width));
    }
    if !current.is_empty() {
        rows.push(current);
    }

    rows.into_iter()
        .map(|row| {
            let content_width = row
                .iter()
                .map(|(_, tw)| ICON_SIZE + ICON_PADDING + tw)
                .sum::<u32>()
                + ITEM_GAP * (row.len() as u32 - 1);
            let start_x = target_width.saturating_sub(content_width) / 2;

            let mut x = start_x;
            let entries = row
                .into_iter()
                .map(|(index, text_width)| {
                    let placed = PlacedEntry {
                        index,
                        x,
                        text_width,
                    };
                    x += ICON_SIZE + ICON_PADDING + text_width + ITEM_GAP;
                    placed
                })
                .collect();

            RowLayout {
                entries,
                content_width,
                start_x,
            }
        })
        .collect()
}

/// Paint the laid-out rows onto a white canvas.
fn paint(
    entries: &[SocialEntry],
    rows: &[RowLayout],
    target_width: u32,
    host: &dyn GlyphHost,
) -> RgbaImage {
    let height = rows.len() as u32 * ROW_HEIGHT;
    let mut canvas = RgbaImage::from_pixel(target_width, height, Rgba([255, 255, 255, 255]));

    for (r, row) in rows.iter().enumerate() {
        let band_top = r as u32 * ROW_HEIGHT;
        let icon_y = band_top + (ROW_HEIGHT - ICON_SIZE) / 2;
        let middle = band_top + ROW_HEIGHT / 2;
        for placed in &row.entries {
            let entry = &entries[placed.index];
            host.draw_icon(
                &mut canvas,
                entry.icon,
                placed.x as i32,
                icon_y as i32,
                ICON_SIZE,
            );
            host.draw_text(
                &mut canvas,
                &entry.label,
                (placed.x + ICON_SIZE + ICON_PADDING) as i32,
                middle as i32,
            );
        }
    }
    canvas
}

/// # Compose a Social Row
///
/// Entries with a blank label are dropped first; when none remain this
/// returns `None` without producing an image.
pub fn compose(
    entries: &[SocialEntry],
    target_width_dots: u16,
    host: &dyn GlyphHost,
) -> Option<RasterImage> {
    let entries: Vec<SocialEntry> = entries
        .iter()
        .filter(|e| !e.label.trim().is_empty())
        .map(|e| SocialEntry::new(e.icon, e.label.trim()))
        .collect();
    if entries.is_empty() || target_width_dots == 0 {
        return None;
    }

    let target = target_width_dots as u32;
    let rows = layout_rows(&entries, target, host);
    debug!(entries = entries.len(), rows = rows.len(), "composed social row");

    let canvas = paint(&entries, &rows, target, host);
    rasterize(&image::DynamicImage::ImageRgba8(canvas), target_width_dots)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::host::SpleenHost;

    /// Every character is 10 dots wide.
    struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure_text(&self, text: &str) -> u32 {
            text.chars().count() as u32 * 10
        }
    }

    fn entry(label: &str) -> SocialEntry {
        SocialEntry::new(SocialIcon::Instagram, label)
    }

    #[test]
    fn test_single_row_centered() {
        // 24 + 6 + 40 = 70 wide
        let rows = layout_rows(&[entry("abcd")], 200, &FixedMeasurer);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content_width, 70);
        assert_eq!(rows[0].start_x, 65);
        assert_eq!(rows[0].entries[0].x, 65);
    }

    #[test]
    fn test_entries_on_one_row_spaced_by_gap() {
        let rows = layout_rows(&[entry("ab"), entry("abc")], 384, &FixedMeasurer);
        assert_eq!(rows.len(), 1);
        // 50 + 16 + 60
        assert_eq!(rows[0].content_width, 126);
        let e = &rows[0].entries;
        assert_eq!(e[1].x - e[0].x, 50 + ITEM_GAP);
    }

    #[test]
    fn test_wrap_boundary_one_entry_over() {
        // Each entry 24 + 6 + 100 = 130; two fit in 276 (130 + 16 + 130),
        // the third would need 422.
        let entries = vec![entry("0123456789"), entry("abcdefghij"), entry("klmnopqrst")];
        let rows = layout_rows(&entries, 276, &FixedMeasurer);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entries.len(), 2);
        assert_eq!(rows[1].entries.len(), 1);
        assert_eq!(rows[1].entries[0].index, 2);
        assert_eq!(rows[0].start_x, 0);
        assert_eq!(rows[1].start_x, (276 - 130) / 2);
        assert_ne!(rows[0].start_x, rows[1].start_x);
    }

    #[test]
    fn test_exact_fit_does_not_wrap() {
        let entries = vec![entry("0123456789"), entry("abcdefghij")];
        let rows = layout_rows(&entries, 276, &FixedMeasurer);
        assert_eq!(rows.len(), 1);
        let rows = layout_rows(&entries, 275, &FixedMeasurer);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_oversized_entry_gets_own_row() {
        let entries = vec![entry("x"), entry(&"w".repeat(50)), entry("y")];
        let rows = layout_rows(&entries, 100, &FixedMeasurer);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].start_x, 0);
    }

    #[test]
    fn test_compose_empty_is_none() {
        let host = SpleenHost::new();
        assert!(compose(&[], 384, &host).is_none());
        assert!(compose(&[entry("  "), entry("")], 384, &host).is_none());
    }

    #[test]
    fn test_compose_dimensions() {
        let host = SpleenHost::new();
        let entries = vec![
            SocialEntry::new(SocialIcon::Facebook, "annapurna"),
            SocialEntry::new(SocialIcon::Instagram, "@annapurna.cafe"),
            SocialEntry::new(SocialIcon::WhatsApp, "9876543210"),
        ];
        // Spleen: 12 dots per char. 138 + 16 + 210 = 364 fits 384, the 150-wide third entry wraps.
        let image = compose(&entries, 384, &host).unwrap();
        assert_eq!(image.width_dots(), 384);
        assert_eq!(image.y_bits() as u32, 2 * ROW_HEIGHT);
        assert_eq!(image.body().len(), 48 * 2 * ROW_HEIGHT as usize);
        assert!(image.body().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_compose_paints_inside_centered_span() {
        let host = SpleenHost::new();
        // 24 + 6 + 24 = 54 wide on a 384 canvas: starts at 165
        let image = compose(&[entry("ab")], 384, &host).unwrap();
        for y in 0..ROW_HEIGHT as usize {
            for x in (0..165).chain(219..384) {
                assert!(!image.is_black(x, y), "stray dot at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_shop_entries_order_and_filter() {
        let shop = ShopIdentity {
            whatsapp: Some("98765".to_string()),
            facebook: Some("cafe".to_string()),
            instagram: Some("   ".to_string()),
            ..Default::default()
        };
        let entries = shop_social_entries(&shop);
        assert_eq!(
            entries,
            vec![
                SocialEntry::new(SocialIcon::Facebook, "cafe"),
                SocialEntry::new(SocialIcon::WhatsApp, "98765"),
            ]
        );
    }
}
