//! Configuration management for the Canchas panel

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Location of the external reservation store
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Scheme + host of the store, empty for same-origin
    #[serde(default)]
    pub api_origin: String,
    /// Path prefix; `None` picks `/api` for same-origin and nothing otherwise
    pub api_prefix: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    pub default_duration_minutes: u32,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables: CANCHAS_<SECTION>__<KEY>
            .add_source(environment())
            .set_override_option("store.api_origin", env::var("CANCHAS_API_ORIGIN").ok())?
            .set_override_option("store.api_prefix", env::var("CANCHAS_API_PREFIX").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl StoreConfig {
    /// Build the absolute URL of a store endpoint.
    ///
    /// Trailing slashes are dropped from the origin and prefix, and the
    /// prefix and path always start with a single `/`.
    pub fn url(&self, path: &str) -> String {
        let origin = self.api_origin.trim_end_matches('/');
        let prefix = match &self.api_prefix {
            Some(prefix) => normalize_prefix(prefix),
            None if origin.is_empty() => "/api".to_string(),
            None => String::new(),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}{}", origin, prefix, path)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        return String::new();
    }
    let prefix = if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{}", prefix)
    };
    prefix.trim_end_matches('/').to_string()
}

/// `CANCHAS_STORE__TIMEOUT_SECS` sets `store.timeout_secs`. Sections and
/// keys are split on a double underscore so keys keep their own underscores.
fn environment() -> Environment {
    Environment::with_prefix("CANCHAS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_origin: "http://localhost:8000".to_string(),
            api_prefix: None,
            timeout_secs: 15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 60,
        }
    }
}
