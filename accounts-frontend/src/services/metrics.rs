//! Prometheus metrics for accounts-frontend.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Backend calls by resource, operation and outcome.
pub static GATEWAY_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "accounts_gateway_requests_total",
        "Total number of backend gateway requests",
        &["resource", "operation", "outcome"] // success, status, transport, decode
    )
    .expect("Failed to register gateway_requests_total")
});

pub static GATEWAY_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "accounts_gateway_request_duration_seconds",
        "Backend gateway request duration in seconds",
        &["resource", "operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register gateway_request_duration")
});

/// Rejected edits and saves by form and reason.
pub static VALIDATION_REJECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "accounts_validation_rejections_total",
        "Total number of validation rejections",
        &["form", "kind"]
    )
    .expect("Failed to register validation_rejections_total")
});

/// Documents successfully handed to the backend.
pub static SUBMISSIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "accounts_submissions_total",
        "Total number of submitted documents by type",
        &["document"]
    )
    .expect("Failed to register submissions_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&GATEWAY_REQUESTS_TOTAL);
    Lazy::force(&GATEWAY_REQUEST_DURATION);
    Lazy::force(&VALIDATION_REJECTIONS_TOTAL);
    Lazy::force(&SUBMISSIONS_TOTAL);
}

pub fn record_rejection(form: &str, kind: &str) {
    VALIDATION_REJECTIONS_TOTAL
        .with_label_values(&[form, kind])
        .inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
