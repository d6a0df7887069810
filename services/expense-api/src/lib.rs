//! HTTP front end for the expense ledger
//!
//! Thin actix-web adapter: inbound requests are normalized into the
//! transport-free envelope, responses are copied back out with the fixed
//! header pair. All behavior lives in `expense-ledger`.

pub mod handlers;
pub mod metrics;
