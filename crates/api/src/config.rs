use chrono::FixedOffset;
use serde::Deserialize;
use std::net::SocketAddr;

use crate::services::api_base::MixedContentPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Adds Strict-Transport-Security. Enable only behind TLS termination.
    #[serde(default)]
    pub hsts_enabled: bool,
}

/// External REST backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Absolute base URL used for server-side calls.
    #[serde(default)]
    pub base_url: String,

    /// How the browser-facing base is adjusted for https pages.
    #[serde(default)]
    pub mixed_content_policy: MixedContentPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapsConfig {
    /// Static map images are omitted when empty.
    #[serde(default)]
    pub google_maps_api_key: String,
}

impl MapsConfig {
    pub fn api_key(&self) -> Option<&str> {
        Some(self.google_maps_api_key.trim()).filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    #[serde(default)]
    pub secure: bool,

    /// SameSite attribute: Strict, Lax or None.
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Optional Domain attribute.
    #[serde(default)]
    pub domain: String,

    /// Max-Age of durable cookies.
    #[serde(default = "default_durable_max_age")]
    pub durable_max_age_secs: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: default_same_site(),
            domain: String::new(),
            durable_max_age_secs: default_durable_max_age(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Offset applied to event times on pages.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_same_site() -> String {
    "Lax".to_string()
}
fn default_durable_max_age() -> i64 {
    31_536_000
}
fn default_utc_offset_hours() -> i32 {
    7
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with INVITE__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("INVITE").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 3000

            [logging]
            level = "info"
            format = "json"

            [backend]
            base_url = ""
            mixed_content_policy = "same_origin"

            [maps]
            google_maps_api_key = ""

            [cookies]
            secure = false
            same_site = "Lax"
            durable_max_age_secs = 31536000

            [display]
            utc_offset_hours = 7
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "INVITE__BACKEND__BASE_URL environment variable must be set".to_string(),
            ));
        }
        if reqwest::Url::parse(base_url).is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "backend.base_url must be an absolute URL, got {}",
                base_url
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.display_zone().is_none() || self.display.utc_offset_hours.abs() > 14 {
            return Err(ConfigValidationError::InvalidValue(
                "display.utc_offset_hours must be between -14 and 14".to_string(),
            ));
        }

        if !matches!(self.cookies.same_site.as_str(), "Strict" | "Lax" | "None") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "cookies.same_site must be Strict, Lax or None, got {}",
                self.cookies.same_site
            )));
        }

        Ok(())
    }

    /// Zone in which event times are shown.
    pub fn display_zone(&self) -> Option<FixedOffset> {
        shared::datetime::display_zone(self.display.utc_offset_hours)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid socket address")
    }
}
