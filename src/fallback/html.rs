//! Printable HTML rendition of a receipt.
//!
//! Produces one standalone HTML5 document with inline styles sized to the
//! paper roll. The same logical sections as the ESC/POS stream appear in
//! the same order, so both channels print the same receipt.

use std::fmt::Write;

use crate::receipt::encode::{money, quantity, signed_money};
use crate::receipt::types::ReceiptData;
use crate::render::social::shop_social_entries;

/// Delay before `window.print()` so images and fonts can settle.
pub const PRINT_DELAY_MS: u32 = 250;

/// Escape text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(out: &mut String, class: &str, left: &str, right: &str) {
    let _ = writeln!(
        out,
        r#"<div class="row {}"><span>{}</span><span>{}</span></div>"#,
        class,
        escape(left),
        escape(right)
    );
}

fn styles(paper_mm: u16) -> String {
    format!(
        r#"@page {{ size: {paper}mm auto; margin: 0; }}
* {{ box-sizing: border-box; }}
body {{ width: {paper}mm; margin: 0; padding: 2mm; font-family: 'Courier New', monospace; font-size: 12px; color: #000; }}
.center {{ text-align: center; }}
.logo {{ max-width: 100%; max-height: 30mm; }}
.shop-name {{ font-size: 18px; font-weight: bold; margin: 2mm 0 1mm; }}
.social span {{ display: inline-block; margin: 0 2mm; }}
.rule {{ border-top: 1px dashed #000; margin: 2mm 0; }}
.rule.double {{ border-top: 3px double #000; }}
.row {{ display: flex; justify-content: space-between; gap: 2mm; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ padding: 0.5mm 0; vertical-align: top; }}
th {{ text-align: left; border-bottom: 1px dashed #000; }}
.num {{ text-align: right; white-space: nowrap; }}
.qty {{ font-size: 11px; }}
.total {{ font-size: 16px; font-weight: bold; }}
.footer {{ margin-top: 3mm; }}
@media print {{ body {{ padding: 0 1mm; }} }}"#,
        paper = paper_mm
    )
}

fn identity(out: &mut String, data: &ReceiptData) {
    out.push_str("<header class=\"center\">\n");
    if let Some(logo) = data.shop.logo_url() {
        let _ = writeln!(out, r#"<img class="logo" src="{}" alt="">"#, escape(logo));
    }
    if let Some(name) = data.shop.display_name() {
        let _ = writeln!(out, r#"<div class="shop-name">{}</div>"#, escape(name));
    }
    if let Some(address) = data.shop.address() {
        for line in address.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let _ = writeln!(out, "<div>{}</div>", escape(line));
        }
    }
    if let Some(contact) = data.shop.contact_number() {
        let _ = writeln!(out, "<div>Tel: {}</div>", escape(contact));
    }
    let social = shop_social_entries(&data.shop);
    if !social.is_empty() {
        out.push_str("<div class=\"social\">");
        for entry in &social {
            let _ = write!(
                out,
                r#"<span class="{}">{}</span>"#,
                entry.icon.name(),
                escape(&entry.label)
            );
        }
        out.push_str("</div>\n");
    }
    out.push_str("</header>\n");
}

fn items(out: &mut String, data: &ReceiptData) {
    out.push_str("<table class=\"items\">\n<thead><tr><th>Item</th><th class=\"num\">Amount</th></tr></thead>\n<tbody>\n");
    for item in &data.items {
        let unit = item
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| format!(" {}", u))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            r#"<tr><td>{}<div class="qty">{}{} x {:.0}</div></td><td class="num">{}</td></tr>"#,
            escape(&item.name),
            quantity(item.quantity),
            escape(&unit),
            item.price,
            money(item.total)
        );
    }
    out.push_str("</tbody>\n</table>\n");
}

/// # Render the Fallback Document
///
/// Text fields are always escaped. The logo URL is used verbatim as the
/// `<img>` source (escaped as an attribute) so the browser fetches it.
pub fn render_document(data: &ReceiptData) -> String {
    let paper = data.printer_width.paper_mm();
    let mut out = String::with_capacity(4096);

    let _ = writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>");
    out.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>Bill {}</title>", escape(&data.bill_no));
    let _ = writeln!(out, "<style>\n{}\n</style>", styles(paper));
    out.push_str("</head>\n");
    let _ = writeln!(
        out,
        "<body onload=\"setTimeout(function () {{ window.print(); }}, {})\">",
        PRINT_DELAY_MS
    );

    identity(&mut out, data);

    out.push_str("<div class=\"rule\"></div>\n");
    row(&mut out, "meta", "Bill No:", &data.bill_no);
    row(&mut out, "meta", "Date:", &data.date);
    row(&mut out, "meta", "Time:", &data.time);
    out.push_str("<div class=\"rule\"></div>\n");

    items(&mut out, data);

    out.push_str("<div class=\"rule\"></div>\n");
    row(&mut out, "subtotal", "Subtotal", &money(data.subtotal));
    for charge in &data.additional_charges {
        row(&mut out, "charge", &charge.name, &signed_money(charge.amount));
    }
    if data.discount != 0.0 {
        row(
            &mut out,
            "discount",
            "Discount",
            &format!("-{}", money(data.discount.abs())),
        );
    }
    out.push_str("<div class=\"rule double\"></div>\n");
    row(&mut out, "total", "TOTAL", &money(data.total));

    out.push_str("<div class=\"rule\"></div>\n");
    row(&mut out, "payment", "Payment:", &data.payment_method);
    for (method, amount) in data.split_payments() {
        row(&mut out, "split", &format!("  {}", method), &money(amount));
    }

    out.push_str("<div class=\"rule\"></div>\n<footer class=\"center footer\">\n");
    for line in data.footer_lines() {
        let _ = writeln!(out, "<div>{}</div>", escape(line));
    }
    out.push_str("</footer>\n</body>\n</html>\n");
    out
}
