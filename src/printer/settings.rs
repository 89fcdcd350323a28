//! Shop settings file.
//!
//! A small JSON document holding the shop's branding and paper width, in
//! the same camelCase shape as receipt records:
//!
//! ```json
//! {
//!   "shopName": "Annapurna Cafe",
//!   "address": "12 Temple Road",
//!   "contactNumber": "9876543210",
//!   "instagram": "@annapurna.cafe",
//!   "logoUrl": "/etc/tillprint/logo.png",
//!   "printerWidth": "58mm"
//! }
//! ```
//!
//! Settings only fill gaps: a receipt's own fields always win.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::config::PrinterWidth;
use crate::error::TillprintError;
use crate::receipt::convert::shop_identity;
use crate::receipt::types::ShopIdentity;

#[derive(Debug, Clone, PartialEq)]
pub struct ShopSettings {
    value: Value,
    shop: ShopIdentity,
    printer_width: Option<PrinterWidth>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            value: Value::Object(Default::default()),
            shop: ShopIdentity::default(),
            printer_width: None,
        }
    }
}

impl ShopSettings {
    /// Validate a settings document.
    pub fn from_value(value: Value) -> Result<Self, TillprintError> {
        let shop = shop_identity(&value)
            .map_err(|e| TillprintError::Config(format!("invalid settings: {}", e)))?;
        let printer_width = match value.get("printerWidth") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.parse().map_err(TillprintError::Config)?),
            Some(Value::Number(n)) => Some(n.to_string().parse().map_err(TillprintError::Config)?),
            Some(other) => {
                return Err(TillprintError::Config(format!(
                    "invalid printerWidth: {}",
                    other
                )));
            }
        };
        Ok(Self {
            value,
            shop,
            printer_width,
        })
    }

    /// Read and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TillprintError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TillprintError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            TillprintError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        let settings = Self::from_value(value)?;
        debug!(path = %path.display(), shop = ?settings.shop.display_name(), "loaded shop settings");
        Ok(settings)
    }

    /// Raw document, as accepted by [`receipt_from_value`](crate::receipt::receipt_from_value).
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn shop(&self) -> &ShopIdentity {
        &self.shop
    }

    pub fn printer_width(&self) -> Option<PrinterWidth> {
        self.printer_width
    }

    /// Force the paper width, overriding the file.
    pub fn set_printer_width(&mut self, width: PrinterWidth) {
        self.printer_width = Some(width);
        if let Value::Object(map) = &mut self.value {
            map.insert("printerWidth".to_string(), Value::String(width.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let settings = ShopSettings::from_value(json!({
            "shopName": "Annapurna Cafe",
            "printerWidth": 80
        }))
        .unwrap();
        assert_eq!(settings.shop().display_name(), Some("Annapurna Cafe"));
        assert_eq!(settings.printer_width(), Some(PrinterWidth::Mm80));
    }

    #[test]
    fn test_rejects_bad_width() {
        assert!(ShopSettings::from_value(json!({ "printerWidth": "76mm" })).is_err());
        assert!(ShopSettings::from_value(json!({ "printerWidth": true })).is_err());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ShopSettings::from_value(json!(["shopName"])).is_err());
    }

    #[test]
    fn test_set_width_updates_document() {
        let mut settings = ShopSettings::default();
        settings.set_printer_width(PrinterWidth::Mm80);
        assert_eq!(settings.value()["printerWidth"], json!("80mm"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ShopSettings::load("/nonexistent/tillprint/settings.json").unwrap_err();
        assert!(matches!(err, TillprintError::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("tillprint-settings-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "hotelName": "Hotel Saravana", "whatsapp": "98765" }"#).unwrap();
        let settings = ShopSettings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.shop().display_name(), Some("Hotel Saravana"));
        assert_eq!(settings.printer_width(), None);
    }
}
