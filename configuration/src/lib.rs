use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub type AppConfig = RedactionConfig;

/// Environment variables fixed by the deployment contract. The storage
/// connection string is resolved from two accepted names, first present wins.
pub const STORAGE_CONNECTION_VARS: [&str; 2] =
    ["AzureWebJobsStorage", "AZURE_STORAGE_CONNECTION_STRING"];
pub const DETECTION_ENDPOINT_VAR: &str = "AZURE_AI_LANGUAGE_ENDPOINT";
pub const DETECTION_KEY_VAR: &str = "AZURE_AI_LANGUAGE_KEY";

const ENV_PREFIX: &str = "REDACTION_SERVICE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_document_language")]
    pub document_language: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub connection_string: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            api_version: default_api_version(),
            document_language: default_document_language(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Build the config from a variable lookup. Service-local settings use the
/// `REDACTION_SERVICE_` prefix; the detection and storage secrets use the
/// contract-fixed names above.
pub fn load_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut config = RedactionConfig::default();

    if let Some(host) = prefixed(&lookup, "HOST") {
        config.server.host = host;
    }
    if let Some(port) = prefixed(&lookup, "PORT") {
        config.server.port = parse_var("PORT", &port)?;
    }
    if let Some(level) = prefixed(&lookup, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(version) = prefixed(&lookup, "DETECTION_API_VERSION") {
        config.service.detection.api_version = version;
    }
    if let Some(language) = prefixed(&lookup, "DOCUMENT_LANGUAGE") {
        config.service.detection.document_language = language;
    }
    if let Some(timeout) = prefixed(&lookup, "DETECTION_TIMEOUT_MS") {
        config.service.detection.request_timeout_ms = parse_var("DETECTION_TIMEOUT_MS", &timeout)?;
    }
    if let Some(timeout) = prefixed(&lookup, "STORAGE_TIMEOUT_MS") {
        config.service.storage.request_timeout_ms = parse_var("STORAGE_TIMEOUT_MS", &timeout)?;
    }

    config.service.detection.endpoint = lookup(DETECTION_ENDPOINT_VAR).filter(|v| !v.is_empty());
    config.service.detection.access_key = lookup(DETECTION_KEY_VAR).filter(|v| !v.is_empty());
    config.service.storage.connection_string = resolve_connection_string(&lookup);

    Ok(config)
}

pub fn resolve_connection_string(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    STORAGE_CONNECTION_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
}

pub fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn prefixed(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(&format!("{ENV_PREFIX}_{name}"))
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_version() -> String {
    "2023-04-01".to_string()
}

fn default_document_language() -> String {
    "en".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}
