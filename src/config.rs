//! Configuration module for the exchange hub.

use serde::Deserialize;
use std::io;
use std::path::Path;

use crate::exchange::MAX_DAY_COUNT;
use crate::{HubError, Result};

/// Configuration file read when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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

/// Pricing service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the NBP API (scheme and host, no trailing path).
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// Total per-request timeout in seconds.
    #[serde(default = "default_rates_timeout")]
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_rates_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Largest day count an exchange command may request (1-10).
    #[serde(default = "default_rates_max_days")]
    pub max_days: u32,
}

fn default_rates_base_url() -> String {
    "http://api.nbp.pl".to_string()
}

fn default_rates_timeout() -> u64 {
    10
}

fn default_rates_connect_timeout() -> u64 {
    5
}

fn default_rates_max_days() -> u32 {
    MAX_DAY_COUNT
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_base_url(),
            timeout_secs: default_rates_timeout(),
            connect_timeout_secs: default_rates_connect_timeout(),
            max_days: default_rates_max_days(),
        }
    }
}

/// Audit log configuration for executed exchange commands.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Whether exchange commands are written to the audit log.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Path to the audit log file.
    #[serde(default = "default_audit_path")]
    pub path: String,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_path() -> String {
    "exchange_logging/exchange.log".to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: default_audit_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/exchange-hub.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Pricing service configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Audit log configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HubError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the configuration a binary was started with.
    ///
    /// An explicitly requested file must load. Without one,
    /// [`DEFAULT_CONFIG_PATH`] is read and only its absence falls back to
    /// defaults; a default file that exists but fails to load is an error.
    /// Environment overrides apply in every case.
    pub fn load_requested(requested: Option<&Path>) -> Result<Self> {
        Self::load_requested_or(requested, Path::new(DEFAULT_CONFIG_PATH))
    }

    fn load_requested_or(requested: Option<&Path>, default_path: &Path) -> Result<Self> {
        if let Some(path) = requested {
            return Self::load_with_env(path);
        }

        match Self::load_with_env(default_path) {
            Err(HubError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.apply_env_overrides();
                Ok(config)
            }
            other => other,
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HubError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `EXCHANGE_HUB_RATES_URL`: Override the pricing service base URL
    /// - `EXCHANGE_HUB_PORT`: Override the listening port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EXCHANGE_HUB_RATES_URL") {
            if !url.is_empty() {
                self.rates.base_url = url;
            }
        }

        if let Ok(port) = std::env::var("EXCHANGE_HUB_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid EXCHANGE_HUB_PORT value: {}", port),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the listening port is zero
    /// - the pricing service base URL is not an http(s) URL
    /// - the request timeout is zero
    /// - `rates.max_days` is outside 1-10
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HubError::Config("server.port must not be 0".to_string()));
        }

        let parsed = url::Url::parse(&self.rates.base_url)
            .map_err(|e| HubError::Config(format!("invalid rates.base_url: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HubError::Config(format!(
                "unsupported rates.base_url scheme: {}",
                parsed.scheme()
            )));
        }

        if self.rates.timeout_secs == 0 {
            return Err(HubError::Config(
                "rates.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_DAY_COUNT).contains(&self.rates.max_days) {
            return Err(HubError::Config(format!(
                "rates.max_days must be between 1 and {}, got {}",
                MAX_DAY_COUNT, self.rates.max_days
            )));
        }

        Ok(())
    }
}
