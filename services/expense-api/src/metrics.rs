//! Prometheus metrics for the HTTP front end
//!
//! # Metrics
//!
//! - `expense_requests_total` - Requests by method and response status
//! - `expense_entries_recorded_total` - Successfully recorded entries

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Requests by method and status
    pub requests_total: IntCounterVec,

    /// Successfully recorded entries
    pub entries_recorded: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let requests_total = IntCounterVec::new(
            Opts::new(
                "expense_requests_total",
                "Requests by method and response status",
            ),
            &["method", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let entries_recorded = IntCounter::with_opts(Opts::new(
            "expense_entries_recorded_total",
            "Successfully recorded entries",
        ))?;
        registry.register(Box::new(entries_recorded.clone()))?;

        Ok(Self {
            requests_total,
            entries_recorded,
            registry,
        })
    }

    /// Record one dispatched request
    pub fn record_request(&self, method: &str, status: u16) {
        self.requests_total
            .with_label_values(&[method, &status.to_string()])
            .inc();

        if method == "POST" && status == 200 {
            self.entries_recorded.inc();
        }
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.entries_recorded.get(), 0);
    }

    #[test]
    fn test_record_request_counts_recorded_entries() {
        let metrics = Metrics::new().unwrap();

        metrics.record_request("POST", 200);
        metrics.record_request("POST", 400);
        metrics.record_request("GET", 200);

        assert_eq!(metrics.entries_recorded.get(), 1);
        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["POST", "400"])
                .get(),
            1
        );
    }
}
