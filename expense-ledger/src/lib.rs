//! Expense Ledger Core
//!
//! Records monetary expense entries per user and returns them filtered by
//! user identity over an injected key-value store.
//!
//! # Architecture
//!
//! - **Exact arithmetic**: `Decimal` for money, never an IEEE binary float
//! - **Injected storage**: handlers hold an `Arc<dyn LedgerStore>`, no globals
//! - **Named policies**: every observed handler variant (placeholder user,
//!   strict user, scan vs indexed listing, id minting) is a construction-time
//!   configuration choice, not a separate code path
//! - **Transport-free envelope**: request dispatch and response encoding are
//!   plain types, testable without a server

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod store;
pub mod types;

// Re-exports
pub use config::{Config, StoreBackend};
pub use envelope::{ApiRequest, ApiResponse, Gateway};
pub use error::{Error, Result};
pub use ledger::ExpenseLedger;
pub use policy::{LedgerPolicy, MissingUserPolicy, SelectionMode, PLACEHOLDER_USER};
pub use store::{LedgerStore, MemoryStore, RocksDbStore, StoreError};
pub use types::{LedgerEntry, RecordRequest, UserId};
