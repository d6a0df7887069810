//! Named behavior policies
//!
//! The source system grew several near-duplicate handler variants that
//! differ only in defaulting and lookup strategy. Each observed variant is
//! preserved here as an explicit construction-time choice so one
//! RecordEntry/ListEntries pair covers all of them.

use serde::{Deserialize, Serialize};

/// Fixed fallback user for the single-tenant deployments
pub const PLACEHOLDER_USER: &str = "user1";

/// How ListEntries selects a user's entries from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Enumerate the whole store, filter in process. O(total entries),
    /// store enumeration order.
    Scan,
    /// Store-native range query on the user partition. O(entries for the
    /// user), store key order.
    Indexed,
}

/// What to do when the caller omits `userId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingUserPolicy {
    /// Fall back to a fixed user. Single-tenant behavior inherited from
    /// the source, kept as an explicit option rather than silently fixed.
    Placeholder(String),
    /// Reject with a validation error.
    Reject,
}

impl MissingUserPolicy {
    /// The conventional single-tenant fallback
    pub fn placeholder() -> Self {
        MissingUserPolicy::Placeholder(PLACEHOLDER_USER.to_string())
    }
}

/// Construction-time behavior of one ledger instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    /// Listing strategy
    pub selection_mode: SelectionMode,

    /// Absent-`userId` handling. Applies to RecordEntry always; applies to
    /// ListEntries only in scan mode — indexed listing rejects regardless.
    pub missing_user: MissingUserPolicy,

    /// Mint a random 128-bit id per entry. When enabled the id joins the
    /// storage key, so same-microsecond inserts for one user both survive.
    pub mint_entry_id: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Scan,
            missing_user: MissingUserPolicy::placeholder(),
            mint_entry_id: false,
        }
    }
}

impl LedgerPolicy {
    /// Strict multi-user variant: indexed listing, required `userId`,
    /// minted entry ids.
    pub fn strict() -> Self {
        Self {
            selection_mode: SelectionMode::Indexed,
            missing_user: MissingUserPolicy::Reject,
            mint_entry_id: true,
        }
    }
}
