//! Currency-safe numeric encoding
//!
//! Amounts must never pass through an IEEE binary float between input
//! parsing and the serialized response. Inbound JSON numbers are read as
//! their exact decimal text (serde_json `arbitrary_precision`) and parsed
//! into `Decimal`; outbound amounts are rendered from the `Decimal`'s own
//! decimal text as plain JSON numbers. Encoding runs once per response
//! over every entry, so all amounts in a payload get identical handling.

use crate::error::{Error, Result};
use crate::types::LedgerEntry;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

/// Parse a caller-supplied amount, accepting numeric and numeric-string
/// forms
pub fn parse_amount(value: &Value) -> Result<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_text(&n.to_string()),
        Value::String(s) => parse_decimal_text(s.trim()),
        _ => Err(Error::validation(
            "amount must be a number or a numeric string",
        )),
    }
}

fn parse_decimal_text(text: &str) -> Result<Decimal> {
    if text.is_empty() {
        return Err(Error::validation("amount is required"));
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| Error::validation(format!("invalid amount: {text}")))
}

/// Render a decimal as a plain JSON number, preserving its exact text
fn decimal_to_number(amount: &Decimal) -> Number {
    // Decimal's display form is always a valid JSON number
    Number::from_str(&amount.to_string()).expect("decimal text parses as a JSON number")
}

/// Encode one response's worth of entries with decimal-safe amounts
pub fn encode_entries(entries: &[LedgerEntry]) -> Value {
    Value::Array(entries.iter().map(encode_entry).collect())
}

fn encode_entry(entry: &LedgerEntry) -> Value {
    let mut value = serde_json::to_value(entry).expect("entry serialization cannot fail");
    if let Value::Object(ref mut fields) = value {
        fields.insert(
            "amount".to_string(),
            Value::Number(decimal_to_number(&entry.amount)),
        );
        // Absent ids stay off the wire entirely
        if entry.id.is_none() {
            fields.remove("id");
        }
    }
    value
}
