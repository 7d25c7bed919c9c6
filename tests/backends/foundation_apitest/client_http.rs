//! Integration tests for `ApiTestClient` over real HTTP.
//!
//! WHY: Validates that prepared requests (URL, defaults, resolved headers,
//! body) reach an actual server unchanged through `ReqwestTransport`.
//!
//! WHAT: Tests every verb, query strings, bodies, status passthrough and
//! transport failures.
//!
//! HOW: Uses `foundation_testing::http::TestHttpServer` with an echo handler
//! returning the received request as JSON.

use super::support::{client_for, config_for, echo_server, echoed_header};
use foundation_apitest::client::{
    uri, uri_from, ApiTestClient, ApiTestClientConfig, RequestBody, TransportError,
};
use foundation_apitest::ApiTestError;
use foundation_testing::http::{HttpResponse, TestHttpServer};
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;
use tracing_test::traced_test;

/// WHY: Verify a GET carries the default Accept header and the built URL
/// WHAT: Tests path elements and query parameters as seen by the server
#[test]
#[traced_test]
fn test_get_reaches_server() {
    let server = echo_server();
    let mut client = client_for(&server);

    let response = client
        .get(&uri_from(["users", "42"]).query_param("expand", "roles"))
        .unwrap();
    assert_eq!(response.status(), 200);

    let echoed = response.json_value().unwrap();
    assert_eq!(echoed["method"], "GET");
    assert_eq!(echoed["path"], "/users/42");
    assert_eq!(echoed["query"], "expand=roles");
    assert_eq!(
        echoed_header(&echoed, "Accept").as_deref(),
        Some("application/json")
    );
}

/// WHY: Verify responses from a real server can be logged from a test
/// WHAT: Tests `ApiTestResponse::log` output under `traced_test`
#[test]
#[traced_test]
fn test_response_log() {
    let server = TestHttpServer::with_response(|_| HttpResponse::ok("pong"));
    let mut client = client_for(&server);

    client.get(&uri("ping")).unwrap().log();
    assert!(logs_contain("Response with code [200] and body [pong]."));
}

/// WHY: Verify bodies and their content type reach the server
/// WHAT: Tests POST, PUT and PATCH with JSON bodies
#[test]
fn test_bodies_reach_server() {
    let server = echo_server();
    let mut client = client_for(&server);

    let created = client
        .post(
            &uri("users"),
            RequestBody::json(&json!({"name": "ewe"})).unwrap(),
        )
        .unwrap()
        .json_value()
        .unwrap();
    assert_eq!(created["method"], "POST");
    assert_eq!(created["body"], r#"{"name":"ewe"}"#);
    assert_eq!(
        echoed_header(&created, "Content-Type").as_deref(),
        Some("application/json")
    );

    let replaced = client
        .put(
            &uri("users/1"),
            RequestBody::from_json_str("{}").with_charset("UTF-8"),
        )
        .unwrap()
        .json_value()
        .unwrap();
    assert_eq!(replaced["method"], "PUT");
    assert_eq!(
        echoed_header(&replaced, "Content-Type").as_deref(),
        Some("application/json; charset=UTF-8")
    );

    let patched = client
        .patch(&uri("users/1"), RequestBody::new("a=1", "text/plain"))
        .unwrap()
        .json_value()
        .unwrap();
    assert_eq!(patched["method"], "PATCH");
    assert_eq!(patched["body"], "a=1");
}

/// WHY: Verify DELETE requests are sent without a body
/// WHAT: Tests the method and missing Content-Type on DELETE
#[test]
fn test_delete() {
    let server = echo_server();
    let mut client = client_for(&server);

    let echoed = client.delete(&uri("users/1")).unwrap().json_value().unwrap();
    assert_eq!(echoed["method"], "DELETE");
    assert_eq!(echoed_header(&echoed, "Content-Type"), None);
    assert_eq!(echoed["body"], "");
}

/// WHY: Verify error statuses are returned to the test, not raised
/// WHAT: Tests a 404 with headers and body, and an unfollowed redirect
#[test]
fn test_status_passthrough() {
    let server = TestHttpServer::with_response(|req| match req.path_only() {
        "/moved" => HttpResponse::status(302, "Found").with_header("Location", "/elsewhere"),
        _ => HttpResponse::status(404, "Not Found")
            .with_header("X-Error-Code", "E404")
            .with_body(br#"{"error":"missing"}"#.to_vec()),
    });
    let mut client = client_for(&server);

    let missing = client.get(&uri("nothing")).unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(missing.header("x-error-code"), Some("E404"));
    assert_eq!(
        missing.json_pointer("/error").unwrap(),
        Some(json!("missing"))
    );

    let moved = client.get(&uri("moved")).unwrap();
    assert_eq!(moved.status(), 302);
    assert_eq!(moved.header("Location"), Some("/elsewhere"));
    assert_eq!(server.requests().len(), 2);
}

/// WHY: Verify the cached body survives repeated reads of a streamed response
/// WHAT: Tests string, JSON and pointer access on one response
#[test]
fn test_response_body_cached() {
    let server = echo_server();
    let mut client = client_for(&server);

    let response = client.get(&uri("cache")).unwrap();
    let text = response.body_string().unwrap();
    assert_eq!(response.body_string().unwrap(), text);
    assert_eq!(
        response.json_pointer("/path").unwrap(),
        Some(json!("/cache"))
    );
}

/// WHY: Verify the entry point path is kept in front of request paths
/// WHAT: Tests an entry point with a base path and trailing slash
#[test]
fn test_entry_point_with_base_path() {
    let server = echo_server();
    let config = ApiTestClientConfig::new(server.url("/api/v2/"));
    let mut client = ApiTestClient::new(&config).unwrap();

    let echoed = client.get(&uri("/status/")).unwrap().json_value().unwrap();
    assert_eq!(echoed["path"], "/api/v2/status");
}

/// WHY: Verify connection failures reach the test as transport errors
/// WHAT: Tests a request against a closed port
#[test]
fn test_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ApiTestClientConfig::new(format!("http://127.0.0.1:{port}"))
        .with_connect_timeout(Duration::from_secs(1));
    let mut client = ApiTestClient::new(&config).unwrap();

    let err = client.get(&uri("users")).unwrap_err();
    assert!(matches!(
        err,
        ApiTestError::Transport(TransportError::ConnectionFailed(_))
    ));
}

/// WHY: Verify a closed client refuses further requests
/// WHAT: Tests `close` on a client bound to a real server
#[test]
fn test_closed_client() {
    let server = echo_server();
    let mut client = ApiTestClient::new(&config_for(&server)).unwrap();
    client.close();

    assert!(matches!(
        client.get(&uri("users")),
        Err(ApiTestError::Transport(TransportError::Closed))
    ));
    assert!(server.requests().is_empty());
}
