//! Configuration of the API test client.
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! entry_point = "http://localhost:8080/api"
//! timeout_ms = 10000
//!
//! [proxy]
//! host = "proxy.local"
//! port = 3128
//! ```

use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the path of a TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "API_TEST_CONFIG";

/// Environment variable holding a bare entry point, used when no
/// configuration file is given.
pub const ENTRY_POINT_ENV: &str = "API_TEST_ENTRY_POINT";

/// HTTP proxy every request is sent through.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Proxy URL in `http://host:port` form.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Settings the client and its default transport are built from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiTestClientConfig {
    /// Base URL every request URI is relative to.
    pub entry_point: String,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    /// Whole-request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Connection timeout in milliseconds.
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

impl ApiTestClientConfig {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            proxy: None,
            timeout_ms: None,
            connect_timeout_ms: None,
        }
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(saturating_millis(timeout));
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(saturating_millis(timeout));
        self
    }

    #[must_use]
    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Parses a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DeserializationFailed` on invalid TOML or
    /// missing fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` if `target` is not a file, or the
    /// read and deserialization errors.
    pub fn from_path<V: Into<PathBuf>>(target: V) -> Result<Self, ConfigError> {
        let target_path = target.into();
        if !target_path.is_file() {
            return Err(ConfigError::InvalidPath(target_path));
        }

        let content = std::fs::read_to_string(&target_path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded API test configuration from {}",
            target_path.display()
        );
        Ok(config)
    }

    /// Loads the configuration named by the environment: the file at
    /// `API_TEST_CONFIG` if set, else the bare `API_TEST_ENTRY_POINT`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvironment` if neither variable is set,
    /// or the errors of [`ApiTestClientConfig::from_path`].
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::from_path(path);
        }

        match std::env::var(ENTRY_POINT_ENV) {
            Ok(entry_point) if !entry_point.trim().is_empty() => Ok(Self::new(entry_point)),
            _ => Err(ConfigError::MissingEnvironment(format!(
                "{CONFIG_PATH_ENV} or {ENTRY_POINT_ENV}"
            ))),
        }
    }
}

// Sub-millisecond precision is not kept.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl FromStr for ApiTestClientConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(content)
    }
}
