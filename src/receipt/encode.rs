//! # ESC/POS Receipt Encoder
//!
//! Assembles a complete receipt as one flat byte buffer.
//!
//! ## Section Order
//!
//! ```text
//! INIT → [LOGO] → [SHOP IDENTITY] → [ADDRESS/CONTACT] → [SOCIAL ROW]
//!      → BILL META → ITEMS → TOTALS → PAYMENT → FOOTER → CUT
//! ```
//!
//! Bracketed sections are skipped when their data is absent. The encoder is
//! a pure function of its inputs: no clock, no I/O, so the same receipt
//! always yields byte-identical output.
//!
//! ## Item Lines
//!
//! ```text
//! Masala Dosa                        ← name, truncated to columns - 14
//!   2 x 40                    80.00  ← unit price 0 decimals, total 2 decimals
//! ```

use super::assets::ReceiptAssets;
use super::types::ReceiptData;
use crate::protocol::RasterImage;
use crate::protocol::commands::{cut_full_feed, feed_lines, init, line_feed};
use crate::protocol::text::{
    align_center, align_left, bold_off, bold_on, double_height_on, double_size_off,
    double_size_on, format_line, line, separator, truncate,
};

/// Columns reserved for the quantity/price and total columns of an item.
pub const ITEM_NAME_RESERVE: usize = 14;

/// Lines fed between the footer and the cut.
pub const FOOTER_FEED_LINES: u8 = 3;

/// Money with two decimals.
pub(crate) fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Money with an explicit sign, for charge deltas.
pub(crate) fn signed_money(amount: f64) -> String {
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{:+.2}", amount)
}

/// Quantities print without a trailing `.0` when whole.
pub(crate) fn quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{:.0}", qty)
    } else {
        let s = format!("{:.3}", qty);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Byte buffer with receipt-level helpers.
struct ReceiptWriter {
    buf: Vec<u8>,
    columns: usize,
}

impl ReceiptWriter {
    fn cmd(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.buf.extend(bytes);
        self
    }

    fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend(line(s));
        self
    }

    fn pair(&mut self, left: &str, right: &str) -> &mut Self {
        let formatted = format_line(left, right, self.columns);
        self.text(&formatted)
    }

    fn rule(&mut self, ch: char) -> &mut Self {
        let rule = separator(ch, self.columns);
        self.text(&rule)
    }

    fn image(&mut self, image: &RasterImage) -> &mut Self {
        self.cmd(align_center());
        self.buf.extend(image.to_bytes());
        self.cmd(line_feed())
    }
}

/// # Encode a Receipt
///
/// `assets` carries the pre-rasterized logo and social row; either being
/// `None` simply omits that image command.
///
/// ## Example
///
/// ```
/// use tillprint::receipt::{encode, ReceiptAssets, ReceiptData};
///
/// let json = r#"{
///     "billNo": "7", "date": "19/10/2026", "time": "9:00 AM",
///     "items": [{ "name": "Tea", "quantity": 2, "price": 15, "total": 30 }],
///     "subtotal": 30, "total": 30, "paymentMethod": "Cash",
///     "shopName": "Corner Tea Stall"
/// }"#;
/// let receipt: ReceiptData = serde_json::from_str(json).unwrap();
///
/// let bytes = encode(&receipt, &ReceiptAssets::default());
/// assert_eq!(&bytes[..2], &[0x1B, 0x40]);
/// assert_eq!(&bytes[bytes.len() - 4..], &[0x1D, 0x56, 0x42, 0x00]);
/// ```
pub fn encode(data: &ReceiptData, assets: &ReceiptAssets) -> Vec<u8> {
    let columns = data.printer_width.columns();
    let mut w = ReceiptWriter {
        buf: Vec::with_capacity(2048),
        columns,
    };

    // INIT
    w.cmd(init());

    // LOGO
    if let Some(logo) = &assets.logo {
        w.image(logo);
    }

    // SHOP IDENTITY
    w.cmd(align_center());
    if let Some(name) = data.shop.display_name() {
        w.cmd(bold_on())
            .cmd(double_size_on())
            .text(name)
            .cmd(double_size_off())
            .cmd(bold_off());
    }

    // ADDRESS/CONTACT
    if let Some(address) = data.shop.address() {
        for part in address.lines().map(str::trim).filter(|l| !l.is_empty()) {
            w.text(part);
        }
    }
    if let Some(contact) = data.shop.contact_number() {
        w.text(&format!("Tel: {}", contact));
    }

    // SOCIAL ROW
    if let Some(social) = &assets.social {
        w.image(social);
    }

    // BILL META
    w.cmd(align_left())
        .rule('-')
        .pair("Bill No:", &data.bill_no)
        .pair("Date:", &data.date)
        .pair("Time:", &data.time)
        .rule('-');

    // ITEMS
    w.cmd(bold_on()).pair("Item", "Amount").cmd(bold_off()).rule('-');
    let name_width = columns.saturating_sub(ITEM_NAME_RESERVE);
    for item in &data.items {
        w.text(truncate(&item.name, name_width));
        let unit = item
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| format!(" {}", u))
            .unwrap_or_default();
        let detail = format!("  {}{} x {:.0}", quantity(item.quantity), unit, item.price);
        w.pair(&detail, &money(item.total));
    }

    // TOTALS
    w.rule('-').pair("Subtotal", &money(data.subtotal));
    for charge in &data.additional_charges {
        w.pair(&charge.name, &signed_money(charge.amount));
    }
    if data.discount != 0.0 {
        w.pair("Discount", &format!("-{}", money(data.discount.abs())));
    }
    w.rule('=')
        .cmd(bold_on())
        .cmd(double_height_on())
        .pair("TOTAL", &money(data.total))
        .cmd(double_size_off())
        .cmd(bold_off());

    // PAYMENT
    w.rule('-').pair("Payment:", &data.payment_method);
    for (method, amount) in data.split_payments() {
        w.pair(&format!("  {}", method), &money(amount));
    }

    // FOOTER
    w.rule('-').cmd(align_center());
    for footer in data.footer_lines() {
        w.text(footer);
    }
    w.cmd(align_left()).cmd(feed_lines(FOOTER_FEED_LINES));

    // CUT
    w.cmd(cut_full_feed(0));

    w.buf
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::PrinterWidth;
    use crate::receipt::types::{LineItem, fixtures};

    fn text_of(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_starts_with_init_ends_with_cut() {
        let bytes = encode(&fixtures::sample(), &ReceiptAssets::default());
        assert_eq!(&bytes[..2], &[0x1B, 0x40]);
        assert!(bytes.ends_with(&[0x1B, 0x64, 3, 0x1D, 0x56, 0x42, 0x00]));
    }

    #[test]
    fn test_deterministic() {
        let receipt = fixtures::sample();
        let assets = ReceiptAssets::default();
        assert_eq!(encode(&receipt, &assets), encode(&receipt, &assets));
    }

    #[test]
    fn test_total_line_uses_caller_total() {
        let bytes = encode(&fixtures::sample(), &ReceiptAssets::default());
        let text = text_of(&bytes);
        assert!(text.contains(&format_line("TOTAL", "105.00", 32)));
        assert!(text.contains(&format_line("Service", "+10.00", 32)));
        assert!(text.contains(&format_line("Discount", "-5.00", 32)));
    }

    #[test]
    fn test_totals_order() {
        let text = text_of(&encode(&fixtures::sample(), &ReceiptAssets::default()));
        let subtotal = text.find("Subtotal").unwrap();
        let charge = text.find("Service").unwrap();
        let discount = text.find("Discount").unwrap();
        let total = text.find("TOTAL").unwrap();
        assert!(subtotal < charge && charge < discount && discount < total);
    }

    #[test]
    fn test_zero_discount_omitted() {
        let mut receipt = fixtures::sample();
        receipt.discount = 0.0;
        receipt.additional_charges.clear();
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        assert!(!text.contains("Discount"));
        assert!(!text.contains("Service"));
    }

    #[test]
    fn test_item_lines() {
        let text = text_of(&encode(&fixtures::sample(), &ReceiptAssets::default()));
        assert!(text.contains(&format_line("  2 x 40", "80.00", 32)));
        assert!(text.contains(&format_line("  1 cup x 20", "20.00", 32)));
    }

    #[test]
    fn test_item_name_truncated() {
        let mut receipt = fixtures::sample();
        receipt.items = vec![LineItem {
            name: "Hyderabadi Chicken Dum Biryani Family Pack".to_string(),
            quantity: 1.0,
            unit: None,
            price: 120.25,
            total: 120.25,
        }];
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        // 32 - 14 = 18 characters
        assert!(text.contains("\nHyderabadi Chicken\n"));
        assert!(!text.contains("Hyderabadi Chicken "));
        // Unit price with 0 decimals, total with 2
        assert!(text.contains(&format_line("  1 x 120", "120.25", 32)));
    }

    #[test]
    fn test_80mm_uses_48_columns() {
        let mut receipt = fixtures::sample();
        receipt.printer_width = PrinterWidth::Mm80;
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        assert!(text.contains(&"-".repeat(48)));
        assert!(text.contains(&format_line("TOTAL", "105.00", 48)));
    }

    #[test]
    fn test_identity_block() {
        let bytes = encode(&fixtures::sample(), &ReceiptAssets::default());
        let mut expected = Vec::new();
        expected.extend(bold_on());
        expected.extend(double_size_on());
        expected.extend(b"Annapurna Cafe\n");
        expected.extend(double_size_off());
        assert!(find(&bytes, &expected).is_some());
        assert!(text_of(&bytes).contains("Tel: 9876543210\n"));
    }

    #[test]
    fn test_images_inserted_in_order() {
        let logo = RasterImage::new(8, 1, vec![0xAA]).unwrap();
        let social = RasterImage::new(8, 1, vec![0x55]).unwrap();
        let assets = ReceiptAssets {
            logo: Some(logo.clone()),
            social: Some(social.clone()),
        };
        let bytes = encode(&fixtures::sample(), &assets);
        let logo_at = find(&bytes, &logo.to_bytes()).unwrap();
        let name_at = find(&bytes, b"Annapurna Cafe").unwrap();
        let social_at = find(&bytes, &social.to_bytes()).unwrap();
        let bill_at = find(&bytes, b"Bill No:").unwrap();
        assert!(logo_at < name_at && name_at < social_at && social_at < bill_at);
    }

    #[test]
    fn test_no_image_command_without_assets() {
        let bytes = encode(&fixtures::sample(), &ReceiptAssets::default());
        assert!(find(&bytes, &[0x1D, 0x76, 0x30]).is_none());
    }

    #[test]
    fn test_split_payments_listed() {
        let mut receipt = fixtures::sample();
        receipt.payment_method = "Split".to_string();
        receipt.payment_details = Some(
            [("Cash".to_string(), 50.0), ("UPI".to_string(), 55.0)]
                .into_iter()
                .collect(),
        );
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        assert!(text.contains(&format_line("Payment:", "Split", 32)));
        assert!(text.contains(&format_line("  Cash", "50.00", 32)));
        assert!(text.contains(&format_line("  UPI", "55.00", 32)));
    }

    #[test]
    fn test_quantity_format() {
        assert_eq!(quantity(2.0), "2");
        assert_eq!(quantity(0.5), "0.5");
        assert_eq!(quantity(1.25), "1.25");
        assert_eq!(quantity(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_charge_sign_follows_amount() {
        assert_eq!(signed_money(10.0), "+10.00");
        assert_eq!(signed_money(-5.0), "-5.00");
        assert_eq!(signed_money(-0.0), "+0.00");

        let mut receipt = fixtures::sample();
        receipt.additional_charges[0].amount = -5.0;
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        assert!(text.contains(&format_line("Service", "-5.00", 32)));
        assert!(!text.contains("+-"));
    }

    #[test]
    fn test_custom_footer() {
        let mut receipt = fixtures::sample();
        receipt.footer = Some("Visit again\nFree WiFi: cafe123".to_string());
        let text = text_of(&encode(&receipt, &ReceiptAssets::default()));
        assert!(text.contains("Visit again\nFree WiFi: cafe123\n"));
        assert!(!text.contains("Please come again"));
    }
}
