use crate::client::{InvalidUri, TransportError};
use derive_more::From;
use std::path::PathBuf;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

pub type ApiTestResult<T> = std::result::Result<T, ApiTestError>;

/// Failure raised by a computed header value.
///
/// The headers manager attaches the header name before handing the error
/// back, so a failing signature or timestamp header can be told apart from
/// another computed header of the same request.
#[derive(Debug)]
pub struct HeaderComputeError {
    header: Option<String>,
    message: String,
    source: Option<BoxedError>,
}

impl HeaderComputeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            header: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            header: None,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn for_header(mut self, name: impl Into<String>) -> Self {
        self.header = Some(name.into());
        self
    }

    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for HeaderComputeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for HeaderComputeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.header {
            Some(header) => write!(
                f,
                "Failed to compute value of header {header}: {}",
                self.message
            ),
            None => write!(f, "Failed to compute header value: {}", self.message),
        }
    }
}

/// Client configuration loading errors.
#[derive(From, Debug)]
pub enum ConfigError {
    #[from(ignore)]
    IOError(std::io::Error),

    #[from(ignore)]
    DeserializationFailed(toml::de::Error),

    #[from(ignore)]
    InvalidPath(PathBuf),

    /// Neither a configuration file nor an entry point was found in the environment.
    #[from(ignore)]
    MissingEnvironment(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::DeserializationFailed(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IOError(err) => write!(f, "Failed to read configuration: {err}"),
            Self::DeserializationFailed(err) => {
                write!(f, "Failed to deserialize configuration: {err}")
            }
            Self::InvalidPath(path) => write!(f, "Invalid configuration path: {}", path.display()),
            Self::MissingEnvironment(var) => {
                write!(f, "Missing configuration environment variable: {var}")
            }
        }
    }
}

/// Errors surfaced to API test code.
///
/// Construction errors (`Uri`, `MissingConfigurator`, `Config`, `Body`) are
/// raised before anything reaches the transport. `HeaderComputation` aborts
/// the request being prepared and `Transport` is the transport's own error,
/// passed through as-is.
#[derive(From, Debug)]
pub enum ApiTestError {
    #[from]
    Uri(InvalidUri),

    #[from]
    HeaderComputation(HeaderComputeError),

    #[from]
    Transport(TransportError),

    #[from]
    Config(ConfigError),

    /// No configurator registered under the requested key.
    #[from(ignore)]
    MissingConfigurator(String),

    /// Request body could not be serialized.
    #[from(ignore)]
    Body(serde_json::Error),

    /// Response body is not the expected JSON.
    #[from(ignore)]
    Json(serde_json::Error),

    /// Reading the response body failed.
    #[from(ignore)]
    ResponseRead(std::io::Error),

    /// The response body stream was consumed by an earlier failed read.
    BodyUnavailable,
}

impl std::error::Error for ApiTestError {}

impl core::fmt::Display for ApiTestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uri(err) => write!(f, "{err}"),
            Self::HeaderComputation(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "Transport error: {err}"),
            Self::Config(err) => write!(f, "Configuration error: {err}"),
            Self::MissingConfigurator(key) => {
                write!(f, "No header configurator registered for key: {key}")
            }
            Self::Body(err) => write!(f, "Failed to serialize request body: {err}"),
            Self::Json(err) => write!(f, "Response body is not valid JSON: {err}"),
            Self::ResponseRead(err) => write!(f, "Failed to read response body: {err}"),
            Self::BodyUnavailable => write!(f, "Response body is no longer available"),
        }
    }
}
