//! Receipt data model.
//!
//! A [`ReceiptData`] is an immutable snapshot of one completed sale, built
//! fresh for each print request and dropped afterwards. Every amount in it
//! has already been resolved by the checkout flow; neither printer backend
//! re-derives totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::printer::PrinterWidth;

/// Footer printed when the receipt carries none of its own.
pub const DEFAULT_FOOTER: &str = "Thank you for visiting!\nPlease come again";

/// One line of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Line total, pre-computed upstream.
    pub total: f64,
}

/// A service charge, tax or other surcharge, already resolved to a currency amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCharge {
    pub name: String,
    pub amount: f64,
}

/// Shop branding printed in the receipt header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    /// Data URI, file path or fetchable URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl ShopIdentity {
    /// Display name: `shop_name`, falling back to `hotel_name`.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.shop_name).or_else(|| non_blank(&self.hotel_name))
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn contact_number(&self) -> Option<&str> {
        non_blank(&self.contact_number)
    }

    pub fn logo_url(&self) -> Option<&str> {
        non_blank(&self.logo_url)
    }

    /// Fill every unset field from `other`.
    pub fn merge_defaults(&mut self, other: &ShopIdentity) {
        fn fill(slot: &mut Option<String>, from: &Option<String>) {
            if non_blank(slot).is_none() && non_blank(from).is_some() {
                *slot = from.clone();
            }
        }
        fill(&mut self.shop_name, &other.shop_name);
        fill(&mut self.hotel_name, &other.hotel_name);
        fill(&mut self.address, &other.address);
        fill(&mut self.contact_number, &other.contact_number);
        fill(&mut self.facebook, &other.facebook);
        fill(&mut self.instagram, &other.instagram);
        fill(&mut self.whatsapp, &other.whatsapp);
        fill(&mut self.logo_url, &other.logo_url);
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// # Receipt Snapshot
///
/// `total` is trusted as given: `subtotal + Σ charges − discount` is the
/// checkout flow's arithmetic, and the encoder prints it verbatim so the
/// receipt can never disagree with what the customer was charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub bill_no: String,
    pub date: String,
    pub time: String,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    #[serde(default)]
    pub additional_charges: Vec<AdditionalCharge>,
    pub payment_method: String,
    /// Split payments, method → amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    pub shop: ShopIdentity,
    #[serde(default)]
    pub printer_width: PrinterWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ReceiptData {
    /// Footer lines, falling back to [`DEFAULT_FOOTER`].
    pub fn footer_lines(&self) -> Vec<&str> {
        non_blank(&self.footer)
            .unwrap_or(DEFAULT_FOOTER)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Split-payment entries with a non-zero amount, in method order.
    pub fn split_payments(&self) -> Vec<(&str, f64)> {
        self.payment_details
            .iter()
            .flatten()
            .filter(|(_, amount)| **amount != 0.0)
            .map(|(method, amount)| (method.as_str(), *amount))
            .collect()
    }

    /// Check the shape the encoder relies on.
    ///
    /// Amounts must be finite and quantities non-negative. Totals are not
    /// cross-checked.
    pub fn validate(&self) -> Result<(), String> {
        let mut amounts: Vec<(&str, f64)> = vec![
            ("subtotal", self.subtotal),
            ("discount", self.discount),
            ("total", self.total),
        ];
        for charge in &self.additional_charges {
            amounts.push(("additionalCharges.amount", charge.amount));
        }
        for item in &self.items {
            amounts.push(("items.price", item.price));
            amounts.push(("items.total", item.total));
            if !item.quantity.is_finite() || item.quantity < 0.0 {
                return Err(format!(
                    "item '{}' has invalid quantity {}",
                    item.name, item.quantity
                ));
            }
        }
        for (method, amount) in self.payment_details.iter().flatten() {
            if !amount.is_finite() {
                return Err(format!("payment '{}' has a non-finite amount", method));
            }
        }
        match amounts.iter().find(|(_, v)| !v.is_finite()) {
            Some((field, value)) => Err(format!("{} is not a finite amount ({})", field, value)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A two-item receipt on 58mm paper with one charge and a discount.
    pub fn sample() -> ReceiptData {
        ReceiptData {
            bill_no: "B-0042".to_string(),
            date: "19/10/2026".to_string(),
            time: "12:30 PM".to_string(),
            items: vec![
                LineItem {
                    name: "Masala Dosa".to_string(),
                    quantity: 2.0,
                    unit: None,
                    price: 40.0,
                    total: 80.0,
                },
                LineItem {
                    name: "Filter Coffee".to_string(),
                    quantity: 1.0,
                    unit: Some("cup".to_string()),
                    price: 20.0,
                    total: 20.0,
                },
            ],
            subtotal: 100.0,
            discount: 5.0,
            total: 105.0,
            additional_charges: vec![AdditionalCharge {
                name: "Service".to_string(),
                amount: 10.0,
            }],
            payment_method: "Cash".to_string(),
            payment_details: None,
            shop: ShopIdentity {
                shop_name: Some("Annapurna Cafe".to_string()),
                address: Some("12 Temple Road".to_string()),
                contact_number: Some("9876543210".to_string()),
                ..Default::default()
            },
            printer_width: PrinterWidth::Mm58,
            footer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_hotel() {
        let shop = ShopIdentity {
            shop_name: Some("  ".to_string()),
            hotel_name: Some("Hotel Blue".to_string()),
            ..Default::default()
        };
        assert_eq!(shop.display_name(), Some("Hotel Blue"));
    }

    #[test]
    fn test_merge_defaults_keeps_own_values() {
        let mut shop = ShopIdentity {
            shop_name: Some("Mine".to_string()),
            ..Default::default()
        };
        let settings = ShopIdentity {
            shop_name: Some("Theirs".to_string()),
            instagram: Some("@cafe".to_string()),
            ..Default::default()
        };
        shop.merge_defaults(&settings);
        assert_eq!(shop.shop_name.as_deref(), Some("Mine"));
        assert_eq!(shop.instagram.as_deref(), Some("@cafe"));
    }

    #[test]
    fn test_footer_default() {
        let receipt = fixtures::sample();
        assert_eq!(
            receipt.footer_lines(),
            vec!["Thank you for visiting!", "Please come again"]
        );
    }

    #[test]
    fn test_split_payments_skip_zero() {
        let mut receipt = fixtures::sample();
        let mut details = BTreeMap::new();
        details.insert("UPI".to_string(), 60.0);
        details.insert("Cash".to_string(), 45.0);
        details.insert("Card".to_string(), 0.0);
        receipt.payment_details = Some(details);
        assert_eq!(receipt.split_payments(), vec![("Cash", 45.0), ("UPI", 60.0)]);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut receipt = fixtures::sample();
        assert!(receipt.validate().is_ok());
        receipt.total = f64::NAN;
        assert!(receipt.validate().unwrap_err().contains("total"));
    }

    #[test]
    fn test_validate_rejects_negative_quantity() {
        let mut receipt = fixtures::sample();
        receipt.items[0].quantity = -1.0;
        assert!(receipt.validate().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(fixtures::sample()).unwrap();
        assert_eq!(json["billNo"], "B-0042");
        assert_eq!(json["printerWidth"], "58mm");
        assert_eq!(json["shopName"], "Annapurna Cafe");
        assert_eq!(json["additionalCharges"][0]["amount"], 10.0);
    }
}
