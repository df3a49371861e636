use axum::http::header;
use axum::response::IntoResponse;

use crate::services::metrics::get_metrics;

/// Prometheus text exposition of everything registered in the default registry.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        get_metrics(),
    )
}
