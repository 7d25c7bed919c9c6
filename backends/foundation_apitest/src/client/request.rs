//! In-progress request types.
//!
//! `ApiRequest` is what the client builds and hands to the transport.
//! `RequestContext` is the read-only view computed headers receive while the
//! request is still being prepared.

use crate::client::{HttpHeaders, Method};
use url::Url;

/// Request ready to be configured with headers and sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HttpHeaders,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HttpHeaders::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }

    /// Sets a header, overwriting any value of the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    /// Returns a view of this request with `headers` standing in for the
    /// request's own headers.
    #[must_use]
    pub fn context_with<'a>(&'a self, headers: &'a HttpHeaders) -> RequestContext<'a> {
        RequestContext {
            method: self.method,
            url: &self.url,
            headers,
            body: self.body.as_deref(),
        }
    }

    #[must_use]
    pub fn context(&self) -> RequestContext<'_> {
        self.context_with(&self.headers)
    }
}

/// Read-only view of the request a computed header is resolved for.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    method: Method,
    url: &'a Url,
    headers: &'a HttpHeaders,
    body: Option<&'a [u8]>,
}

impl<'a> RequestContext<'a> {
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn url(&self) -> &'a Url {
        self.url
    }

    /// Headers set so far: the client defaults plus every header resolved
    /// before the one being computed.
    #[must_use]
    pub fn headers(&self) -> &'a HttpHeaders {
        self.headers
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name)
    }

    #[must_use]
    pub fn body(&self) -> Option<&'a [u8]> {
        self.body
    }
}
