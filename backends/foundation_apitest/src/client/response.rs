//! Response wrapper handed to test code.
//!
//! WHY: Assertions usually read the body several times (raw, as text, as
//! JSON) while the transport only offers it as a one-shot stream.
//!
//! WHAT: `ApiTestResponse` exposes status, headers and body accessors.
//!
//! HOW: The body is read on first access and cached. If that read fails the
//! stream is gone and every later access reports `BodyUnavailable`.

use crate::client::{HttpHeaders, TransportResponse};
use crate::{ApiTestError, ApiTestResult};
use serde::de::DeserializeOwned;
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::io::Read;

pub struct ApiTestResponse {
    status: u16,
    headers: HttpHeaders,
    raw_body: RefCell<Option<Box<dyn Read + Send>>>,
    body: OnceCell<Vec<u8>>,
}

impl fmt::Debug for ApiTestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiTestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_read", &self.body.get().is_some())
            .finish_non_exhaustive()
    }
}

impl From<TransportResponse> for ApiTestResponse {
    fn from(response: TransportResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            raw_body: RefCell::new(Some(response.body.into_reader())),
            body: OnceCell::new(),
        }
    }
}

impl ApiTestResponse {
    /// HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// First value of a response header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    #[must_use]
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Response body bytes, read once and cached.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::ResponseRead` if reading the body fails and
    /// `ApiTestError::BodyUnavailable` on any access after such a failure.
    pub fn body_bytes(&self) -> ApiTestResult<&[u8]> {
        if let Some(body) = self.body.get() {
            return Ok(body.as_slice());
        }

        let mut reader = self
            .raw_body
            .borrow_mut()
            .take()
            .ok_or(ApiTestError::BodyUnavailable)?;

        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(ApiTestError::ResponseRead)?;

        Ok(self.body.get_or_init(|| body).as_slice())
    }

    /// Response body as text. Invalid UTF-8 sequences are replaced.
    ///
    /// # Errors
    ///
    /// See [`ApiTestResponse::body_bytes`].
    pub fn body_string(&self) -> ApiTestResult<String> {
        Ok(String::from_utf8_lossy(self.body_bytes()?).into_owned())
    }

    /// Response body deserialized from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Json` if the body is not a valid `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiTestResult<T> {
        serde_json::from_slice(self.body_bytes()?).map_err(ApiTestError::Json)
    }

    /// Response body as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Json` if the body is not JSON.
    pub fn json_value(&self) -> ApiTestResult<serde_json::Value> {
        self.json()
    }

    /// Value at a JSON pointer (e.g. `/data/0/id`) of the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Json` if the body is not JSON.
    pub fn json_pointer(&self, pointer: &str) -> ApiTestResult<Option<serde_json::Value>> {
        Ok(self.json_value()?.pointer(pointer).cloned())
    }

    /// Logs the status and body at info level.
    pub fn log(&self) {
        match self.body_string() {
            Ok(body) => tracing::info!("Response with code [{}] and body [{}].", self.status, body),
            Err(err) => tracing::info!(
                "Response with code [{}] and unreadable body ({}).",
                self.status,
                err
            ),
        }
    }
}
