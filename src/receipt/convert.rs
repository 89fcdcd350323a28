//! Conversion from loosely-typed backend records to [`ReceiptData`].
//!
//! Rows coming out of the hosted data store are plain JSON: amounts may be
//! numbers or numeric strings, optional fields may be `null` or missing, and
//! the shop branding lives in a separate settings record. Everything is
//! checked here so the encoder only ever sees a fully-typed receipt.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{AdditionalCharge, LineItem, ReceiptData, ShopIdentity};
use crate::printer::PrinterWidth;

/// Errors from JSON → ReceiptData conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// A field value is invalid.
    #[error("invalid {field}: {message}")]
    InvalidField { field: String, message: String },
    /// A required field is missing.
    #[error("missing required field '{field}'")]
    MissingField { field: String },
}

fn invalid(field: &str, message: impl Into<String>) -> ConvertError {
    ConvertError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

fn missing(field: &str) -> ConvertError {
    ConvertError::MissingField {
        field: field.to_string(),
    }
}

/// Build a receipt from a backend record, with shop settings merged in.
///
/// `settings` fills any identity field the record leaves unset, and supplies
/// `printerWidth` when the record has none.
pub fn receipt_from_value(
    record: &Value,
    settings: Option<&Value>,
) -> Result<ReceiptData, ConvertError> {
    let obj = as_object(record, "receipt")?;

    let items = match obj.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| line_item(item, i))
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Null) | None => return Err(missing("items")),
        Some(_) => return Err(invalid("items", "expected an array")),
    };

    let additional_charges = match obj.get("additionalCharges") {
        Some(Value::Array(charges)) => charges
            .iter()
            .enumerate()
            .map(|(i, charge)| additional_charge(charge, i))
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(invalid("additionalCharges", "expected an array")),
    };

    let payment_details = match obj.get("paymentDetails") {
        Some(Value::Object(details)) => {
            let mut map = BTreeMap::new();
            for (method, amount) in details {
                let field = format!("paymentDetails.{}", method);
                map.insert(method.clone(), amount_value(amount, &field)?);
            }
            Some(map)
        }
        Some(Value::Null) | None => None,
        Some(_) => return Err(invalid("paymentDetails", "expected an object")),
    };

    let mut shop = shop_identity(record)?;
    let mut printer_width = optional_width(obj.get("printerWidth"))?;
    if let Some(settings) = settings {
        shop.merge_defaults(&shop_identity(settings)?);
        if printer_width.is_none() {
            let settings_obj = as_object(settings, "settings")?;
            printer_width = optional_width(settings_obj.get("printerWidth"))?;
        }
    }

    let receipt = ReceiptData {
        bill_no: required_string(obj, "billNo")?,
        date: required_string(obj, "date")?,
        time: required_string(obj, "time")?,
        items,
        subtotal: required_amount(obj, "subtotal")?,
        discount: optional_amount(obj, "discount")?.unwrap_or(0.0),
        total: required_amount(obj, "total")?,
        additional_charges,
        payment_method: optional_string(obj, "paymentMethod")?
            .unwrap_or_else(|| "Cash".to_string()),
        payment_details,
        shop,
        printer_width: printer_width.unwrap_or_default(),
        footer: optional_string(obj, "footer")?,
    };

    receipt.validate().map_err(|msg| invalid("receipt", msg))?;
    Ok(receipt)
}

/// Extract the shop identity fields of a receipt or settings record.
pub fn shop_identity(value: &Value) -> Result<ShopIdentity, ConvertError> {
    let obj = as_object(value, "shop")?;
    Ok(ShopIdentity {
        shop_name: optional_string(obj, "shopName")?,
        hotel_name: optional_string(obj, "hotelName")?,
        address: optional_string(obj, "address")?,
        contact_number: optional_string(obj, "contactNumber")?,
        facebook: optional_string(obj, "facebook")?,
        instagram: optional_string(obj, "instagram")?,
        whatsapp: optional_string(obj, "whatsapp")?,
        logo_url: optional_string(obj, "logoUrl")?,
    })
}

fn line_item(value: &Value, index: usize) -> Result<LineItem, ConvertError> {
    let obj = as_object(value, &format!("items[{}]", index))?;
    let field = |name: &str| format!("items[{}].{}", index, name);

    let name = match obj.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => return Err(missing(&field("name"))),
        Some(_) => return Err(invalid(&field("name"), "expected a string")),
    };
    let amount = |key: &str| -> Result<f64, ConvertError> {
        match obj.get(key) {
            Some(Value::Null) | None => Err(missing(&field(key))),
            Some(v) => amount_value(v, &field(key)),
        }
    };

    let quantity = amount("quantity")?;
    let price = amount("price")?;
    // Printed as stored, never re-derived from quantity and price.
    let total = amount("total")?;

    Ok(LineItem {
        name,
        quantity,
        unit: optional_string(obj, "unit")?,
        price,
        total,
    })
}

fn additional_charge(value: &Value, index: usize) -> Result<AdditionalCharge, ConvertError> {
    let obj = as_object(value, &format!("additionalCharges[{}]", index))?;
    let field = |name: &str| format!("additionalCharges[{}].{}", index, name);
    Ok(AdditionalCharge {
        name: optional_string(obj, "name")?.ok_or_else(|| missing(&field("name")))?,
        amount: match obj.get("amount") {
            Some(Value::Null) | None => return Err(missing(&field("amount"))),
            Some(v) => amount_value(v, &field("amount"))?,
        },
    })
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, ConvertError> {
    value
        .as_object()
        .ok_or_else(|| invalid(field, "expected an object"))
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, ConvertError> {
    optional_string(obj, key)?.ok_or_else(|| missing(key))
}

/// Strings and numbers both become strings (bill numbers are often numeric).
fn optional_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ConvertError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(invalid(key, "expected a string")),
    }
}

fn required_amount(obj: &Map<String, Value>, key: &str) -> Result<f64, ConvertError> {
    optional_amount(obj, key)?.ok_or_else(|| missing(key))
}

fn optional_amount(obj: &Map<String, Value>, key: &str) -> Result<Option<f64>, ConvertError> {
    match obj.get(key) {
        Some(Value::Null) | None => Ok(None),
        Some(v) => amount_value(v, key).map(Some),
    }
}

/// Decimal columns come back as strings from the data store.
fn amount_value(value: &Value, field: &str) -> Result<f64, ConvertError> {
    let amount = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(field, "number out of range"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(field, format!("'{}' is not a number", s)))?,
        _ => return Err(invalid(field, "expected a number")),
    };
    if !amount.is_finite() {
        return Err(invalid(field, "not a finite number"));
    }
    Ok(amount)
}

fn optional_width(value: Option<&Value>) -> Result<Option<PrinterWidth>, ConvertError> {
    match value {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|e: String| invalid("printerWidth", e)),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(58) => Ok(Some(PrinterWidth::Mm58)),
            Some(80) => Ok(Some(PrinterWidth::Mm80)),
            _ => Err(invalid("printerWidth", format!("unsupported width {}", n))),
        },
        Some(_) => Err(invalid("printerWidth", "expected '58mm' or '80mm'")),
    }
}
