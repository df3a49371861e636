use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub numbering: NumberingSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the backend of record, e.g. `http://localhost:5000/api`.
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Bearer token forwarded on every backend call when set.
    #[serde(default)]
    pub api_token: Option<Secret<String>>,
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Client-side document numbering. Only payments are numbered locally;
/// every other document number is previewed by the backend.
#[derive(Deserialize, Clone, Debug)]
pub struct NumberingSettings {
    #[serde(default = "default_payment_prefix")]
    pub payment_prefix: String,
    #[serde(default = "default_payment_width")]
    pub payment_width: usize,
}

impl Default for NumberingSettings {
    fn default() -> Self {
        Self {
            payment_prefix: default_payment_prefix(),
            payment_width: default_payment_width(),
        }
    }
}

fn default_payment_prefix() -> String {
    "PAY".to_string()
}

fn default_payment_width() -> usize {
    5
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Spans are only exported when this is set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_service_name() -> String {
    "accounts-frontend".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {}", e)))?;

    // Allow running from the workspace root or from inside the crate
    let configuration_directory = if base_path.ends_with("accounts-frontend") {
        base_path.join("config")
    } else {
        base_path.join("accounts-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
