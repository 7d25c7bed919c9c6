//! Request bodies.

use crate::{ApiTestError, ApiTestResult};
use serde::Serialize;

pub const APPLICATION_JSON: &str = "application/json";

/// Raw request body with its media type and optional charset.
///
/// # Examples
///
/// ```rust
/// use foundation_apitest::client::RequestBody;
///
/// let body = RequestBody::from_json_str(r#"{"name":"ewe"}"#).with_charset("UTF-8");
/// assert_eq!(body.content_type(), "application/json; charset=UTF-8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    bytes: Vec<u8>,
    media_type: String,
    charset: Option<String>,
}

impl RequestBody {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            charset: None,
        }
    }

    /// JSON body from an already serialized string.
    pub fn from_json_str(json: impl Into<String>) -> Self {
        Self::new(json.into().into_bytes(), APPLICATION_JSON)
    }

    /// JSON body from a JSON value.
    #[must_use]
    pub fn from_json_value(json: &serde_json::Value) -> Self {
        Self::from_json_str(json.to_string())
    }

    /// JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Body` if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ApiTestResult<Self> {
        let bytes = serde_json::to_vec(value).map_err(ApiTestError::Body)?;
        Ok(Self::new(bytes, APPLICATION_JSON))
    }

    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Value of the `Content-Type` header for this body.
    #[must_use]
    pub fn content_type(&self) -> String {
        match &self.charset {
            Some(charset) => format!("{}; charset={charset}", self.media_type),
            None => self.media_type.clone(),
        }
    }
}
