//! Transport abstraction the client sends requests through.
//!
//! WHY: The header engine and the client are independent of how bytes reach
//! the API. Tests of the library itself use an in-memory transport, API
//! tests use a real HTTP client.
//!
//! WHAT: `Transport` sends one fully prepared `ApiRequest` and returns the
//! status, headers and body of the response.
//!
//! HOW: Blocking and synchronous. A transport is owned by one client and
//! released exactly once through `close`.

use crate::client::{ApiRequest, HttpHeaders, TransportError};
use std::fmt;
use std::io::Read;

/// Sends prepared requests.
pub trait Transport {
    /// Sends the request as-is.
    ///
    /// # Errors
    ///
    /// Any transport failure, reported unchanged to the caller.
    fn send(&mut self, request: &ApiRequest) -> Result<TransportResponse, TransportError>;

    /// Releases the resources held by this transport.
    fn close(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: &ApiRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Body of a transport response.
pub enum TransportBody {
    /// Fully buffered body.
    Bytes(Vec<u8>),
    /// Body still to be read from the connection.
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for TransportBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Self::Reader(_) => write!(f, "Reader"),
        }
    }
}

impl TransportBody {
    #[must_use]
    pub fn empty() -> Self {
        TransportBody::Bytes(Vec::new())
    }

    pub(crate) fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            TransportBody::Bytes(bytes) => Box::new(std::io::Cursor::new(bytes)),
            TransportBody::Reader(reader) => reader,
        }
    }
}

impl From<Vec<u8>> for TransportBody {
    fn from(bytes: Vec<u8>) -> Self {
        TransportBody::Bytes(bytes)
    }
}

impl From<&str> for TransportBody {
    fn from(text: &str) -> Self {
        TransportBody::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for TransportBody {
    fn from(text: String) -> Self {
        TransportBody::Bytes(text.into_bytes())
    }
}

/// Response as returned by a transport.
#[derive(Debug)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: TransportBody,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HttpHeaders::new(),
            body: TransportBody::empty(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<TransportBody>) -> Self {
        self.body = body.into();
        self
    }
}
