//! Route handlers
//!
//! One any-method route carries the whole ledger contract so the
//! envelope's 405 path is exercised for real; `/health` and `/metrics`
//! sit beside it for operations.

use crate::metrics::Metrics;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use expense_ledger::{ApiRequest, ApiResponse, Gateway};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::collections::HashMap;

/// Shared application state
pub struct AppState {
    /// Ledger front door
    pub gateway: Gateway,
    /// Metrics collector
    pub metrics: Metrics,
}

/// Adapt the actix request into the envelope and dispatch it
pub async fn dispatch(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    let api_request = ApiRequest {
        method: req.method().as_str().to_string(),
        query,
        body: if body.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&body).into_owned())
        },
    };

    let response = state.gateway.handle(&api_request);
    state
        .metrics
        .record_request(&api_request.method, response.status);

    to_http(response)
}

fn to_http(response: ApiResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = HttpResponse::build(status);
    for (name, value) in ApiResponse::HEADERS {
        builder.insert_header((name, value));
    }
    builder.body(response.body)
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "expense-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics_endpoint(state: web::Data<AppState>) -> HttpResponse {
    let metric_families = state.metrics.registry().gather();
    let mut buffer = Vec::new();

    let encoder = TextEncoder::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        .service(web::resource("/expenses").route(web::route().to(dispatch)));
}
