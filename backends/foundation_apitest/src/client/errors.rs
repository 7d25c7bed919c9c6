use crate::BoxedError;
use derive_more::From;
use std::fmt;
use std::io;

/// Error returned when an API URI cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUri {
    message: String,
}

impl InvalidUri {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvalidUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URI entry point, path elements or query parameters are invalid: {}",
            self.message
        )
    }
}

impl std::error::Error for InvalidUri {}

/// Transport errors.
///
/// These are produced by a [`Transport`](super::Transport) implementation and
/// reach the caller unchanged.
#[derive(From, Debug)]
pub enum TransportError {
    /// Connection could not be established.
    #[from(ignore)]
    ConnectionFailed(String),

    /// The transport gave up waiting.
    #[from(ignore)]
    Timeout(String),

    /// The transport refused the request before sending it
    /// (e.g. a header name it cannot encode).
    #[from(ignore)]
    InvalidRequest(String),

    /// The transport was already released.
    Closed,

    /// I/O error during communication.
    #[from]
    Io(io::Error),

    /// Generic error with boxed error type.
    #[from(ignore)]
    Other(BoxedError),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}

impl std::error::Error for TransportError {}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Connection failed: {msg}"),
            Self::Timeout(msg) => write!(f, "Timeout: {msg}"),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            Self::Closed => write!(f, "Transport already closed"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Other(err) => write!(f, "Transport error: {err}"),
        }
    }
}
