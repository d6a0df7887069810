//! Error types for the expense ledger

use crate::store::StoreError;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// The taxonomy maps one-to-one onto response statuses: caller input
/// problems are 400, unsupported methods 405, store failures 500.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Unsupported HTTP method
    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    /// Ledger Store call failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MethodNotSupported(_) => 405,
            Error::Store(_) => 500,
        }
    }

    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
