//! Core types for the expense ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Stable wire shape (camelCase JSON fields)
//! - Deterministic storage keys (microsecond ISO-8601 timestamps)

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Owning user identifier
///
/// Trusted caller input; no format constraint is enforced beyond
/// non-emptiness at the operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded expense
///
/// Created exactly once by RecordEntry, never mutated or deleted.
/// `(user_id, timestamp)` addresses the entry in the store; the optional
/// `id` disambiguates sub-microsecond collisions when minting is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Owning user (trusted input)
    pub user_id: UserId,

    /// Server-stamped creation instant, microsecond resolution
    #[serde(with = "micro_ts")]
    pub timestamp: DateTime<Utc>,

    /// Expense amount (exact decimal)
    pub amount: Decimal,

    /// Category, defaults to "Other"
    pub category: String,

    /// Free-text description, defaults to empty
    pub description: String,

    /// Optional store-independent uniqueness token
    ///
    /// Serialized as a plain `Option` so the binary storage codec sees a
    /// fixed field layout; the JSON codec strips the null on responses.
    #[serde(default)]
    pub id: Option<Uuid>,
}

impl LedgerEntry {
    /// Timestamp rendered in the storage-key form
    pub fn timestamp_key(&self) -> String {
        format_micro_ts(&self.timestamp)
    }
}

/// Current UTC instant truncated to microsecond resolution
///
/// Truncation keeps the in-memory value identical to its serialized form,
/// so key derivation and round-trip comparisons never disagree.
pub fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// ISO-8601 UTC format with exactly six fractional digits
const MICRO_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

fn format_micro_ts(ts: &DateTime<Utc>) -> String {
    ts.format(MICRO_TS_FORMAT).to_string()
}

/// Serde adapter for the microsecond ISO-8601 timestamp form
pub mod micro_ts {
    use super::{format_micro_ts, MICRO_TS_FORMAT};
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize as `2024-01-15T09:30:00.123456Z`
    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_micro_ts(ts))
    }

    /// Parse the microsecond ISO-8601 form back to a UTC instant
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, MICRO_TS_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Loosely-typed RecordEntry input
///
/// `amount` is kept as raw JSON so numeric and numeric-string forms both
/// parse without passing through `f64`; see [`crate::codec::parse_amount`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    /// Owning user; subject to the missing-user policy when absent
    #[serde(default)]
    pub user_id: Option<String>,

    /// Required amount, JSON number or numeric string
    #[serde(default)]
    pub amount: Option<serde_json::Value>,

    /// Optional category
    #[serde(default)]
    pub category: Option<String>,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry() -> LedgerEntry {
        LedgerEntry {
            user_id: UserId::new("u1"),
            timestamp: now_micros(),
            amount: Decimal::from_str("12.34").unwrap(),
            category: "Food".to_string(),
            description: "Lunch".to_string(),
            id: None,
        }
    }

    #[test]
    fn test_timestamp_key_has_six_fraction_digits() {
        let key = entry().timestamp_key();
        let fraction = key.split('.').nth(1).unwrap();
        assert_eq!(fraction, format!("{}Z", &fraction[..6]));
        assert_eq!(fraction.len(), 7); // six digits + trailing Z
    }

    #[test]
    fn test_entry_json_round_trip() {
        let original = entry();
        let json = serde_json::to_string(&original).unwrap();
        let decoded: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("userId"));
        assert!(obj.contains_key("timestamp"));
        assert!(obj.contains_key("amount"));
    }

    #[test]
    fn test_entry_deserializes_without_id_field() {
        let decoded: LedgerEntry = serde_json::from_str(
            r#"{"userId":"u1","timestamp":"2024-01-15T09:30:00.123456Z",
                "amount":"12.34","category":"Food","description":"Lunch"}"#,
        )
        .unwrap();
        assert!(decoded.id.is_none());
        assert_eq!(decoded.user_id.as_str(), "u1");
    }

    #[test]
    fn test_record_request_accepts_partial_body() {
        let req: RecordRequest = serde_json::from_str(r#"{"amount": "19.99"}"#).unwrap();
        assert!(req.user_id.is_none());
        assert!(req.amount.is_some());
        assert!(req.category.is_none());
    }

    #[test]
    fn test_now_micros_truncates_nanoseconds() {
        let ts = now_micros();
        assert_eq!(ts.nanosecond() % 1_000, 0);
    }
}
