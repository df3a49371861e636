use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::health_check,
    invoices::preview_invoice,
    metrics::metrics,
    payments::{create_supplier_payment, next_payment_number},
    pdcs::{bounce_pdc, realise_pdc},
    receipts::create_receipt,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/invoices/preview", post(preview_invoice))
        .route("/payments", post(create_supplier_payment))
        .route("/payments/next-number", get(next_payment_number))
        .route("/receipts", post(create_receipt))
        .route("/pdcs/:id/realise", patch(realise_pdc))
        .route("/pdcs/:id/bounce", patch(bounce_pdc));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
