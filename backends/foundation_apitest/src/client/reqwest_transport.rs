//! Blocking HTTP transport backed by `reqwest`.

use crate::client::{
    ApiRequest, ApiTestClientConfig, HttpHeaders, Method, Transport, TransportBody,
    TransportError, TransportResponse,
};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

/// Sends requests over HTTP with a blocking `reqwest` client.
///
/// Redirects are not followed so tests observe the status the API returned.
/// Proxies from the environment are ignored; only the configured proxy is
/// used.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Option<Client>,
}

impl ReqwestTransport {
    /// Builds a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the proxy address is invalid or the
    /// underlying client cannot be built.
    pub fn new(config: &ApiTestClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().redirect(Policy::none());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }

        builder = match config.proxy() {
            Some(proxy) => {
                tracing::debug!("Using proxy {}", proxy.url());
                builder.proxy(reqwest::Proxy::all(proxy.url())?)
            }
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: Some(builder.build()?),
        })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

impl Transport for ReqwestTransport {
    fn send(&mut self, request: &ApiRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client.as_ref().ok_or(TransportError::Closed)?;

        let mut builder = client.request(to_reqwest_method(request.method()), request.url().clone());
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send()?;

        let status = response.status().as_u16();
        let headers: HttpHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(TransportResponse {
            status,
            headers,
            body: TransportBody::Reader(Box::new(response)),
        })
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("Released HTTP transport");
        }
    }
}
