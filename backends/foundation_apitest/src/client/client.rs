//! API test client.
//!
//! WHY: API tests want one call per request (`client.get(&uri("users"))`)
//! while headers are declared ahead of time for one call or for the whole
//! test.
//!
//! WHAT: `ApiTestClient` owns the entry point, the headers manager of the
//! test and the transport. Each call builds a request, resolves the pending
//! headers onto it and hands it to the transport.
//!
//! HOW: A request is prepared in a fixed order: URL from the entry point and
//! URI builder, default `Accept` and `Content-Type`, resolved headers
//! (overwriting same-named defaults), then the transport. Anything failing
//! before the transport means nothing was sent. Transport errors are
//! returned unchanged, nothing is retried.

use crate::client::{
    ApiRequest, ApiTestClientConfig, ApiTestResponse, ApiUriBuilder, Method, RequestBody,
    RequestContext, ReqwestTransport, Transport, TransportError, APPLICATION_JSON,
};
use crate::headers::{HeaderConfiguration, HeaderEntry, HeadersManager};
use crate::{ApiTestError, ApiTestResult, HeaderComputeError};

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Client issuing requests against the API under test.
///
/// # Type Parameters
///
/// * `T` - Transport requests are sent through. Defaults to
///   [`ReqwestTransport`].
///
/// The transport is closed when the client is closed or dropped, including
/// when the test body panics.
#[derive(Debug)]
pub struct ApiTestClient<T: Transport = ReqwestTransport> {
    entry_point: String,
    transport: T,
    headers: HeadersManager,
    closed: bool,
}

impl ApiTestClient<ReqwestTransport> {
    /// Creates a client sending requests over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ApiTestClientConfig) -> ApiTestResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config.entry_point.clone(), transport))
    }
}

impl<T: Transport> ApiTestClient<T> {
    /// Creates a client sending requests through `transport`.
    pub fn with_transport(entry_point: impl Into<String>, transport: T) -> Self {
        Self::with_headers(entry_point, transport, HeadersManager::new())
    }

    /// Creates a client reusing an already configured headers manager.
    pub fn with_headers(entry_point: impl Into<String>, transport: T, headers: HeadersManager) -> Self {
        Self {
            entry_point: entry_point.into(),
            transport,
            headers,
            closed: false,
        }
    }

    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Builds, configures and sends one request.
    ///
    /// # Errors
    ///
    /// - `ApiTestError::Uri` if the URL cannot be built
    /// - `ApiTestError::HeaderComputation` if a computed header fails
    /// - `ApiTestError::Transport` for any transport failure, including use
    ///   after `close`
    #[tracing::instrument(level = "debug", skip(self, uri, body))]
    pub fn execute(
        &mut self,
        method: Method,
        uri: &ApiUriBuilder,
        body: Option<RequestBody>,
    ) -> ApiTestResult<ApiTestResponse> {
        if self.closed {
            return Err(ApiTestError::Transport(TransportError::Closed));
        }

        let url = uri.build(&self.entry_point)?;
        let mut request = ApiRequest::new(method, url);

        request.set_header(ACCEPT, APPLICATION_JSON);
        if let Some(body) = body {
            request.set_header(CONTENT_TYPE, body.content_type());
            request.set_body(body.into_bytes());
        }

        self.headers.configure_request(&mut request)?;

        tracing::debug!(
            "Sending {} {} with {} header(s)",
            request.method(),
            request.url(),
            request.headers().len()
        );
        let response = self.transport.send(&request)?;
        tracing::debug!("Received status {}", response.status);

        Ok(ApiTestResponse::from(response))
    }

    /// GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClient::execute`].
    pub fn get(&mut self, uri: &ApiUriBuilder) -> ApiTestResult<ApiTestResponse> {
        self.execute(Method::Get, uri, None)
    }

    /// POST request with a body.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClient::execute`].
    pub fn post(&mut self, uri: &ApiUriBuilder, body: RequestBody) -> ApiTestResult<ApiTestResponse> {
        self.execute(Method::Post, uri, Some(body))
    }

    /// PUT request with a body.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClient::execute`].
    pub fn put(&mut self, uri: &ApiUriBuilder, body: RequestBody) -> ApiTestResult<ApiTestResponse> {
        self.execute(Method::Put, uri, Some(body))
    }

    /// PATCH request with a body.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClient::execute`].
    pub fn patch(&mut self, uri: &ApiUriBuilder, body: RequestBody) -> ApiTestResult<ApiTestResponse> {
        self.execute(Method::Patch, uri, Some(body))
    }

    /// DELETE request.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClient::execute`].
    pub fn delete(&mut self, uri: &ApiUriBuilder) -> ApiTestResult<ApiTestResponse> {
        self.execute(Method::Delete, uri, None)
    }

    /// Sets a header for every remaining request.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value, true);
    }

    /// Sets a header for the next request only.
    pub fn set_header_for_next_request(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value, false);
    }

    /// Sets a header computed for each request it is sent with.
    pub fn set_computed_header<F>(&mut self, name: impl Into<String>, computation: F)
    where
        F: Fn(&RequestContext<'_>) -> Result<String, HeaderComputeError> + Send + Sync + 'static,
    {
        self.headers.set_computed(name, computation, true);
    }

    /// Registers a prepared entry for every remaining request.
    pub fn set_header_entry(&mut self, entry: HeaderEntry) {
        self.headers.register(entry, true);
    }

    /// Registers a prepared entry for the next request only.
    pub fn set_header_entry_for_next_request(&mut self, entry: HeaderEntry) {
        self.headers.register(entry, false);
    }

    /// Replaces an already set header for every remaining request.
    pub fn replace_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.replace(name, value, true);
    }

    /// Replaces an already set header for the next request only.
    pub fn replace_header_for_next_request(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.headers.replace(name, value, false);
    }

    /// Removes an already set header for every remaining request.
    pub fn remove_header(&mut self, name: impl Into<String>) {
        self.headers.remove(name, true);
    }

    /// Removes an already set header for the next request only.
    pub fn remove_header_for_next_request(&mut self, name: impl Into<String>) {
        self.headers.remove(name, false);
    }

    /// Applies a header configuration to every remaining request.
    pub fn configure_headers(&mut self, configuration: &dyn HeaderConfiguration) {
        self.headers.apply_configuration(configuration, true);
    }

    /// Applies a header configuration to the next request only.
    pub fn configure_headers_for_next_request(&mut self, configuration: &dyn HeaderConfiguration) {
        self.headers.apply_configuration(configuration, false);
    }

    #[must_use]
    pub fn headers(&self) -> &HeadersManager {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeadersManager {
        &mut self.headers
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the transport. Later requests fail with
    /// `TransportError::Closed`.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.transport.close();
        tracing::debug!("Closed API test client for {}", self.entry_point);
    }
}

impl<T: Transport> Drop for ApiTestClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}
