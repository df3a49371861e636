use std::sync::Arc;

use accounts_frontend::config::get_configuration;
use accounts_frontend::services::BackendClient;
use accounts_frontend::startup::build_router;
use accounts_frontend::AppState;
use dotenvy::dotenv;
use service_core::observability::logging::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let telemetry = &configuration.telemetry;
    init_tracing(
        &telemetry.service_name,
        &telemetry.log_level,
        telemetry.otlp_endpoint.as_deref(),
    )?;

    accounts_frontend::services::metrics::init_metrics();

    let backend = BackendClient::new(configuration.backend.clone());
    info!(backend_url = %backend.base_url(), "Backend of record configured");

    let state = AppState::new(Arc::new(backend), configuration.numbering.clone());
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting accounts-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
