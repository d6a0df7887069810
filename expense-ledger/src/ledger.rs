//! Ledger operations
//!
//! `ExpenseLedger` ties the store and the behavior policy into the two
//! operations of the contract: RecordEntry and ListEntries. Instances are
//! stateless beyond the injected store handle; concurrent calls never
//! coordinate, and a `put` is never retried.

use crate::codec;
use crate::error::{Error, Result};
use crate::policy::{LedgerPolicy, MissingUserPolicy, SelectionMode};
use crate::store::LedgerStore;
use crate::types::{now_micros, LedgerEntry, RecordRequest, UserId};
use std::sync::Arc;
use uuid::Uuid;

/// Default category when the caller supplies none
const DEFAULT_CATEGORY: &str = "Other";

/// Confirmation text returned by RecordEntry
pub const RECORD_CONFIRMATION: &str = "Expense added successfully";

/// RecordEntry/ListEntries over an injected store
pub struct ExpenseLedger {
    store: Arc<dyn LedgerStore>,
    policy: LedgerPolicy,
}

impl std::fmt::Debug for ExpenseLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseLedger")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ExpenseLedger {
    /// Construct with an injected store and a behavior policy
    pub fn new(store: Arc<dyn LedgerStore>, policy: LedgerPolicy) -> Self {
        Self { store, policy }
    }

    /// Validate and append one entry
    ///
    /// Stamps the current UTC instant at microsecond resolution, mints an
    /// id when the policy asks for one, and performs exactly one durable
    /// write. Returns the confirmation message; the entry is deliberately
    /// not echoed back.
    pub fn record_entry(&self, request: RecordRequest) -> Result<&'static str> {
        let user_id = self.resolve_user(request.user_id.as_deref())?;

        let amount_raw = request
            .amount
            .as_ref()
            .ok_or_else(|| Error::validation("amount is required"))?;
        let amount = codec::parse_amount(amount_raw)?;

        let entry = LedgerEntry {
            user_id: UserId::new(user_id),
            timestamp: now_micros(),
            amount,
            category: request
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            description: request.description.unwrap_or_default(),
            id: self.policy.mint_entry_id.then(Uuid::new_v4),
        };

        self.store.put(&entry)?;

        tracing::info!(
            user_id = %entry.user_id,
            category = %entry.category,
            "Expense recorded"
        );

        Ok(RECORD_CONFIRMATION)
    }

    /// Retrieve all entries belonging to one user
    ///
    /// Scan mode enumerates the whole store and filters in process; it may
    /// fall back to the placeholder user when configured to. Indexed mode
    /// queries the user partition directly and always rejects an absent
    /// `userId`.
    pub fn list_entries(&self, user_id: Option<&str>) -> Result<Vec<LedgerEntry>> {
        match self.policy.selection_mode {
            SelectionMode::Scan => {
                let user = self.resolve_user(user_id)?;
                let entries = self
                    .store
                    .scan()?
                    .into_iter()
                    .filter(|entry| entry.user_id.as_str() == user)
                    .collect::<Vec<_>>();

                tracing::debug!(user_id = %user, count = entries.len(), "Scan listing");
                Ok(entries)
            }
            SelectionMode::Indexed => {
                let user = non_empty(user_id)
                    .ok_or_else(|| Error::validation("userId query parameter is required"))?;
                ensure_no_nul(user)?;
                let entries = self.store.query_by_user(user)?;

                tracing::debug!(user_id = %user, count = entries.len(), "Indexed listing");
                Ok(entries)
            }
        }
    }

    fn resolve_user(&self, user_id: Option<&str>) -> Result<String> {
        match non_empty(user_id) {
            Some(user) => {
                ensure_no_nul(user)?;
                Ok(user.to_string())
            }
            None => match &self.policy.missing_user {
                MissingUserPolicy::Placeholder(fallback) => Ok(fallback.clone()),
                MissingUserPolicy::Reject => Err(Error::validation("userId is required")),
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// NUL is the storage-key separator; a userId carrying one could straddle
// another user's partition on a range query
fn ensure_no_nul(user: &str) -> Result<()> {
    if user.contains('\0') {
        return Err(Error::validation("userId must not contain a NUL byte"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PLACEHOLDER_USER;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn ledger(policy: LedgerPolicy) -> ExpenseLedger {
        ExpenseLedger::new(Arc::new(MemoryStore::new()), policy)
    }

    fn record(ledger: &ExpenseLedger, user: Option<&str>, amount: serde_json::Value) {
        ledger
            .record_entry(RecordRequest {
                user_id: user.map(String::from),
                amount: Some(amount),
                category: None,
                description: None,
            })
            .unwrap();
    }

    #[test]
    fn test_record_then_list_exact_amount() {
        let ledger = ledger(LedgerPolicy::default());
        record(&ledger, Some("u1"), json!("12.34"));

        let entries = ledger.list_entries(Some("u1")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, Decimal::new(1234, 2));
        assert_eq!(entries[0].category, "Other");
        assert_eq!(entries[0].description, "");
    }

    #[test]
    fn test_record_without_amount_fails() {
        let ledger = ledger(LedgerPolicy::default());
        let result = ledger.record_entry(RecordRequest::default());

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_record_without_user_uses_placeholder() {
        let ledger = ledger(LedgerPolicy::default());
        record(&ledger, None, json!(5));

        let entries = ledger.list_entries(Some(PLACEHOLDER_USER)).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_record_without_user_rejected_under_strict_policy() {
        let ledger = ledger(LedgerPolicy::strict());
        let result = ledger.record_entry(RecordRequest {
            amount: Some(json!(5)),
            ..Default::default()
        });

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_list_never_returns_other_users() {
        let ledger = ledger(LedgerPolicy::default());
        record(&ledger, Some("u1"), json!("1.00"));
        record(&ledger, Some("u2"), json!("2.00"));

        let entries = ledger.list_entries(Some("u1")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id.as_str(), "u1");
    }

    #[test]
    fn test_indexed_list_requires_user() {
        let ledger = ledger(LedgerPolicy::strict());
        assert!(matches!(
            ledger.list_entries(None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            ledger.list_entries(Some("")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_scan_list_falls_back_to_placeholder() {
        let ledger = ledger(LedgerPolicy::default());
        record(&ledger, None, json!("3.50"));

        let entries = ledger.list_entries(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id.as_str(), PLACEHOLDER_USER);
    }

    #[test]
    fn test_minted_id_present_under_strict_policy() {
        let ledger = ledger(LedgerPolicy::strict());
        record(&ledger, Some("u1"), json!("9.99"));

        let entries = ledger.list_entries(Some("u1")).unwrap();
        assert!(entries[0].id.is_some());
    }

    #[test]
    fn test_user_with_nul_byte_rejected_in_both_modes() {
        // "u\0x" keys would begin with the "u" partition prefix "u\0",
        // so a range query for "u" would return them while the scan
        // filter would not; the operations reject the input instead
        let scan = ledger(LedgerPolicy::default());
        let result = scan.record_entry(RecordRequest {
            user_id: Some("u\u{0}x".to_string()),
            amount: Some(json!(1)),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(matches!(
            scan.list_entries(Some("u\u{0}x")),
            Err(Error::Validation(_))
        ));

        let indexed = ledger(LedgerPolicy::strict());
        assert!(matches!(
            indexed.list_entries(Some("u\u{0}x")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_modes_agree_when_user_shares_partition_prefix() {
        let store = Arc::new(MemoryStore::new());
        let scan = ExpenseLedger::new(store.clone(), LedgerPolicy::default());
        let indexed = ExpenseLedger::new(
            store,
            LedgerPolicy {
                selection_mode: SelectionMode::Indexed,
                ..LedgerPolicy::strict()
            },
        );

        record(&scan, Some("u"), json!("1.00"));
        record(&scan, Some("u1"), json!("2.00"));

        for user in ["u", "u1"] {
            let from_scan = scan.list_entries(Some(user)).unwrap();
            let from_index = indexed.list_entries(Some(user)).unwrap();
            assert_eq!(from_scan.len(), 1);
            assert_eq!(from_scan, from_index);
        }
    }

    #[test]
    fn test_empty_category_defaults_to_other() {
        let ledger = ledger(LedgerPolicy::default());
        ledger
            .record_entry(RecordRequest {
                user_id: Some("u1".to_string()),
                amount: Some(json!(1)),
                category: Some(String::new()),
                description: Some("note".to_string()),
            })
            .unwrap();

        let entries = ledger.list_entries(Some("u1")).unwrap();
        assert_eq!(entries[0].category, "Other");
        assert_eq!(entries[0].description, "note");
    }
}
