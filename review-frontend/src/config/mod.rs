use crate::models::{DocumentQuery, SortDirection, SortableColumn};
use serde::Deserialize;
use service_core::observability::TracingConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the document API, without a trailing slash (e.g. http://api:3000/api).
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_backend_url() -> String {
    "http://localhost:3000/api".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// Whether an access token without an `exp` claim counts as valid.
    #[serde(default)]
    pub accept_tokens_without_expiry: bool,
    #[serde(default = "default_session_inactivity_hours")]
    pub session_inactivity_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            accept_tokens_without_expiry: false,
            session_inactivity_hours: default_session_inactivity_hours(),
        }
    }
}

fn default_session_inactivity_hours() -> i64 {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: SortableColumn,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: SortDirection,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
        }
    }
}

impl DashboardSettings {
    /// Pagination state every dashboard starts from.
    pub fn initial_query(&self) -> DocumentQuery {
        DocumentQuery {
            size: self.page_size,
            sort_by: Some(self.sort_by),
            sort_direction: Some(self.sort_direction),
            ..DocumentQuery::default()
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_sort_by() -> SortableColumn {
    SortableColumn::UpdatedAt
}

fn default_sort_direction() -> SortDirection {
    SortDirection::Desc
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            otlp_endpoint: None,
            json: default_json(),
        }
    }
}

impl LoggingSettings {
    pub fn tracing_config(&self, service_name: &str) -> TracingConfig {
        TracingConfig {
            service_name: service_name.to_string(),
            log_level: self.level.clone(),
            otlp_endpoint: self.otlp_endpoint.clone(),
            json: self.json,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    true
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No current directory: {}", e)))?;

    // Running from the workspace root or from inside review-frontend.
    let configuration_directory = if base_path.ends_with("review-frontend") {
        base_path.join("config")
    } else {
        base_path.join("review-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
