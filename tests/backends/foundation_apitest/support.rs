//! Shared fixtures: a localhost server echoing each request back as JSON.

use foundation_apitest::client::{ApiTestClient, ApiTestClientConfig};
use foundation_testing::http::{HttpRequest, HttpResponse, TestHttpServer};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Answers with `{"method", "path", "query", "headers", "body"}`, header
/// names lowercased.
pub fn echo(request: &HttpRequest) -> HttpResponse {
    let headers: Map<String, Value> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), Value::String(value.clone())))
        .collect();

    let body = json!({
        "method": request.method,
        "path": request.path_only(),
        "query": request.query(),
        "headers": headers,
        "body": request.body_text(),
    });

    HttpResponse::json(body.to_string())
}

pub fn echo_server() -> TestHttpServer {
    TestHttpServer::with_response(echo)
}

pub fn config_for(server: &TestHttpServer) -> ApiTestClientConfig {
    ApiTestClientConfig::new(server.base_url())
        .with_timeout(Duration::from_secs(5))
        .with_connect_timeout(Duration::from_secs(2))
}

pub fn client_for(server: &TestHttpServer) -> ApiTestClient {
    ApiTestClient::new(&config_for(server)).expect("HTTP client should build")
}

/// Value of a header as seen by the echo server.
pub fn echoed_header(echoed: &Value, name: &str) -> Option<String> {
    echoed
        .pointer(&format!("/headers/{}", name.to_ascii_lowercase()))
        .and_then(Value::as_str)
        .map(str::to_string)
}
