//! Invoices API configuration module.
//!
//! Layered with the `config` crate, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `invoices.toml` in the working directory (optional)
//! 3. `INVOICES_*` environment variables (`INVOICES_HTTP_PORT=9000`)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

/// Default `tracing` filter when neither `RUST_LOG` nor
/// `INVOICES_LOG_FILTER` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,invoices=debug,sqlx=warn";

/// Invoices API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub http_host: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file, created on first start
    pub database_path: PathBuf,

    /// Upper bound of the SQLite connection pool
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,

    /// `tracing-subscriber` filter directives
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from defaults, `invoices.toml` and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(None)
    }

    /// Same as [`load`](Self::load), with environment variables taken from
    /// `vars` instead of the process when given.
    pub fn from_environment(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let environment = Environment::with_prefix("INVOICES")
            .try_parsing(true)
            .source(vars);

        let config: AppConfig = Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8080_i64)?
            .set_default("database_path", "invoices.db")?
            .set_default("max_connections", 5_i64)?
            .set_default("connect_timeout_secs", 30_i64)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::with_name("invoices").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("http_host".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("connect_timeout_secs".to_string()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
