//! Request/response envelope
//!
//! Normalizes an inbound HTTP-like request into a typed operation call and
//! serializes the result with decimal-safe encoding and the fixed header
//! pair. The envelope is transport-free; the HTTP service adapts its
//! framework request into [`ApiRequest`] and copies [`ApiResponse`] back
//! out.
//!
//! Status policy: 200 on success, 400 for every caller-attributable
//! validation failure, 405 for an unsupported method, 500 strictly for
//! store failures.

use crate::codec;
use crate::error::{Error, Result};
use crate::ledger::ExpenseLedger;
use crate::types::RecordRequest;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Inbound request shape
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// HTTP method token
    pub method: String,

    /// Query parameters
    pub query: HashMap<String, String>,

    /// Raw request body, when present
    pub body: Option<String>,
}

impl ApiRequest {
    /// GET request with an optional `userId` query parameter
    pub fn get(user_id: Option<&str>) -> Self {
        let mut query = HashMap::new();
        if let Some(user) = user_id {
            query.insert("userId".to_string(), user.to_string());
        }
        Self {
            method: "GET".to_string(),
            query,
            body: None,
        }
    }

    /// POST request with a JSON body
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            query: HashMap::new(),
            body: Some(body.into()),
        }
    }
}

/// Outbound response shape
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Serialized JSON body
    pub body: String,
}

impl ApiResponse {
    /// The fixed header pair carried by every response, success or failure
    pub const HEADERS: [(&'static str, &'static str); 2] = [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
    ];

    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }
}

/// Method-dispatching front door over one ledger instance
#[derive(Debug)]
pub struct Gateway {
    ledger: ExpenseLedger,
}

impl Gateway {
    /// Wrap a constructed ledger
    pub fn new(ledger: ExpenseLedger) -> Self {
        Self { ledger }
    }

    /// Dispatch one request: `POST` records, `GET` lists, anything else
    /// is rejected with 405
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let method = request.method.to_ascii_uppercase();

        tracing::debug!(method = %method, "Dispatching request");

        let result = match method.as_str() {
            "POST" => self.record(request),
            "GET" => self.list(request),
            _ => Err(Error::MethodNotSupported(method)),
        };

        match result {
            Ok(body) => ApiResponse::ok(body),
            Err(err) => {
                tracing::warn!(status = err.status_code(), error = %err, "Request failed");
                ApiResponse::error(&err)
            }
        }
    }

    fn record(&self, request: &ApiRequest) -> Result<Value> {
        let body = request
            .body
            .as_deref()
            .ok_or_else(|| Error::validation("request body is required"))?;

        let record: RecordRequest = serde_json::from_str(body)
            .map_err(|e| Error::validation(format!("invalid request body: {}", e)))?;

        let message = self.ledger.record_entry(record)?;
        Ok(json!({ "message": message }))
    }

    fn list(&self, request: &ApiRequest) -> Result<Value> {
        let user_id = request.query.get("userId").map(String::as_str);
        let entries = self.ledger.list_entries(user_id)?;
        Ok(json!({ "expenses": codec::encode_entries(&entries) }))
    }
}
