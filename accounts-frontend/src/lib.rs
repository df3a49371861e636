pub mod config;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use std::sync::Arc;

use config::NumberingSettings;
use services::BackendGateway;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn BackendGateway>,
    pub numbering: NumberingSettings,
}

impl AppState {
    pub fn new(gateway: Arc<dyn BackendGateway>, numbering: NumberingSettings) -> Self {
        Self { gateway, numbering }
    }
}
