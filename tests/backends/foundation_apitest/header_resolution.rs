//! Integration tests for header resolution as observed on the wire.
//!
//! WHY: The headers manager decides the exact header set of each request;
//! these tests check what the server actually receives across a sequence of
//! requests.
//!
//! WHAT: Tests scope rules, precedence, removal and replacement, computed
//! headers and configuration bundles end-to-end.
//!
//! HOW: Each test sends consecutive requests through `ReqwestTransport` to an
//! echo server and inspects the headers echoed back.

use super::support::{client_for, echo_server, echoed_header};
use foundation_apitest::client::{uri, ApiTestClient};
use foundation_apitest::headers::{
    basic_auth_value, timestamp_header, HeaderBundle, HeaderOperation,
};
use foundation_apitest::{ApiTestError, HeaderComputeError};
use serde_json::Value;

fn send(client: &mut ApiTestClient) -> Value {
    client.get(&uri("probe")).unwrap().json_value().unwrap()
}

/// WHY: An all-requests header is sent with every request
/// WHAT: set(X, 1, all) is received on three consecutive requests
#[test]
fn test_all_requests_header_on_every_request() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header("X-Tenant", "acme");

    for _ in 0..3 {
        assert_eq!(
            echoed_header(&send(&mut client), "X-Tenant").as_deref(),
            Some("acme")
        );
    }
}

/// WHY: The first SET of a batch wins over a later one
/// WHAT: set(X, 1, all) then set(X, 2, next) sends X=1 both times
#[test]
fn test_first_set_wins() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header("X", "1");
    client.set_header_for_next_request("X", "2");

    assert_eq!(echoed_header(&send(&mut client), "X").as_deref(), Some("1"));
    assert_eq!(echoed_header(&send(&mut client), "X").as_deref(), Some("1"));
}

/// WHY: A next-request removal suppresses a header once
/// WHAT: set(X, 1, all) then remove(X, next) omits X once, then sends it again
#[test]
fn test_next_request_removal() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header("X", "1");
    client.remove_header_for_next_request("X");

    assert_eq!(echoed_header(&send(&mut client), "X"), None);
    assert_eq!(echoed_header(&send(&mut client), "X").as_deref(), Some("1"));
}

/// WHY: Replacing a header nobody set must not add it
/// WHAT: replace(Y, 2, all) with no prior Y never sends Y
#[test]
fn test_replace_without_prior_header() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.replace_header("Y", "2");

    assert_eq!(echoed_header(&send(&mut client), "Y"), None);
    assert_eq!(echoed_header(&send(&mut client), "Y"), None);
}

/// WHY: All-requests replacement and removal keep applying
/// WHAT: replace(A, all) and remove(B, all) hold on later requests
#[test]
fn test_all_requests_replace_and_remove_persist() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header("A", "old");
    client.set_header("B", "gone-soon");
    client.replace_header("A", "new");
    client.remove_header("B");

    for _ in 0..2 {
        let echoed = send(&mut client);
        assert_eq!(echoed_header(&echoed, "A").as_deref(), Some("new"));
        assert_eq!(echoed_header(&echoed, "B"), None);
    }
}

/// WHY: Resolved headers override the client's defaults
/// WHAT: A one-off Accept replaces application/json for one request
#[test]
fn test_override_default_accept() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header_for_next_request("Accept", "text/csv");

    assert_eq!(
        echoed_header(&send(&mut client), "Accept").as_deref(),
        Some("text/csv")
    );
    assert_eq!(
        echoed_header(&send(&mut client), "Accept").as_deref(),
        Some("application/json")
    );
}

/// WHY: Computed headers are evaluated per request against that request
/// WHAT: A signature over method, path and an earlier header differs per path
#[test]
fn test_computed_signature_header() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_header("X-Key-Id", "k1");
    client.set_computed_header("X-Signature", |ctx| {
        let key = ctx
            .header("X-Key-Id")
            .ok_or_else(|| HeaderComputeError::new("missing key id"))?;
        Ok(format!("{key}:{}:{}", ctx.method(), ctx.url().path()))
    });

    let first = client.get(&uri("a")).unwrap().json_value().unwrap();
    let second = client.get(&uri("b")).unwrap().json_value().unwrap();

    assert_eq!(
        echoed_header(&first, "X-Signature").as_deref(),
        Some("k1:GET:/a")
    );
    assert_eq!(
        echoed_header(&second, "X-Signature").as_deref(),
        Some("k1:GET:/b")
    );
}

/// WHY: A failing computed header aborts the request before it is sent
/// WHAT: Tests that the server receives nothing and the error names the header
#[test]
fn test_failing_computed_header_sends_nothing() {
    let server = echo_server();
    let mut client = client_for(&server);
    client.set_computed_header("X-Signature", |_| {
        Err(HeaderComputeError::new("signing key unavailable"))
    });

    let Err(ApiTestError::HeaderComputation(err)) = client.get(&uri("a")) else {
        panic!("expected a header computation error");
    };
    assert_eq!(err.header(), Some("X-Signature"));
    assert!(server.requests().is_empty());
}

/// WHY: Bundles apply and can be removed as a whole for one request
/// WHAT: Tests basic auth and timestamp headers from a bundle, then a one-off removal
#[test]
fn test_bundle_application_and_removal() {
    let server = echo_server();
    let mut client = client_for(&server);

    let auth = HeaderBundle::new("auth")
        .set("Authorization", basic_auth_value("admin", "pw"))
        .entry(timestamp_header("X-Timestamp"));
    client.configure_headers(&auth);

    let first = send(&mut client);
    assert_eq!(
        echoed_header(&first, "Authorization").as_deref(),
        Some("Basic YWRtaW46cHc=")
    );
    let timestamp = echoed_header(&first, "X-Timestamp").unwrap();
    assert!(looks_like_utc_timestamp(&timestamp));

    client
        .headers_mut()
        .apply_configuration_as(&auth, HeaderOperation::Remove, false);
    let anonymous = send(&mut client);
    assert_eq!(echoed_header(&anonymous, "Authorization"), None);
    assert_eq!(echoed_header(&anonymous, "X-Timestamp"), None);

    let again = send(&mut client);
    assert!(echoed_header(&again, "Authorization").is_some());
}

// 2014-03-07T09:05:02Z
fn looks_like_utc_timestamp(timestamp: &str) -> bool {
    timestamp.len() == 20 && timestamp.ends_with('Z') && timestamp.as_bytes()[10] == b'T'
}
