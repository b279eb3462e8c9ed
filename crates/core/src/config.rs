//! Configuration management for Errata.
//!
//! Configuration is read from an optional TOML file and then overridden by
//! `ERRATA_*` environment variables. Every field has a default so the
//! service can start with no file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Default error reporting support directory
pub const DEFAULT_BASE_DIR: &str = "/var/error-reporting";

/// Default listen port
pub const DEFAULT_PORT: u16 = 9191;

/// Path the service publishes its public key on
pub const PUBLIC_KEY_ROUTE: &str = "/error-reporting/public-key";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crypto: CryptoConfig,
    pub server: ServerConfig,
    pub health: HealthConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Directory holding the `gpg/` key material
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// URL the public-key identity probe fetches. Derived from the listen
    /// port when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_url: Option<String>,
    /// Seconds between health-check runs
    pub interval_secs: u64,
    /// Upper bound for a single check before it is reported unhealthy
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable output
    pub json: bool,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            public_key_url: None,
            interval_secs: 60,
            timeout_secs: 10,
        }
    }
}

impl HealthConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Config {
    /// Probe target: the configured URL, else this service's own public-key
    /// route on the listen port.
    pub fn public_key_url(&self) -> String {
        match &self.health.public_key_url {
            Some(url) => url.clone(),
            None => format!("http://localhost:{}{}", self.server.port, PUBLIC_KEY_ROUTE),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file (when given) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ERRATA_*` overrides using `lookup` to resolve variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ERRATA_BASE_DIR") {
            self.crypto.base_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("ERRATA_PORT") {
            self.server.port = parse_override("ERRATA_PORT", &port)?;
        }
        if let Some(url) = lookup("ERRATA_PUBLIC_KEY_URL") {
            self.health.public_key_url = Some(url);
        }
        if let Some(secs) = lookup("ERRATA_HEALTH_INTERVAL_SECS") {
            self.health.interval_secs = parse_override("ERRATA_HEALTH_INTERVAL_SECS", &secs)?;
        }
        if let Some(secs) = lookup("ERRATA_HEALTH_TIMEOUT_SECS") {
            self.health.timeout_secs = parse_override("ERRATA_HEALTH_TIMEOUT_SECS", &secs)?;
        }
        if let Some(json) = lookup("ERRATA_LOG_JSON") {
            self.log.json = parse_override("ERRATA_LOG_JSON", &json)?;
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
