//! Integration tests for `ApiTestHarness` against a real server.
//!
//! WHY: The harness is how API tests are meant to be written: declare the
//! configurators, get a ready client, never manage the transport.
//!
//! WHAT: Tests configurator application over HTTP, isolation between runs
//! and loading the entry point from the environment.
//!
//! HOW: Echo server from `foundation_testing`, `ReqwestTransport` built by
//! the harness for each run.

use super::support::{config_for, echo_server, echoed_header};
use foundation_apitest::client::{uri, CONFIG_PATH_ENV, ENTRY_POINT_ENV};
use foundation_apitest::harness::ApiTestHarness;
use foundation_apitest::headers::{
    timestamp_header, BasicAuthConfiguration, HeaderBundle, HeaderConfiguration,
};
use foundation_apitest::ApiTestError;
use serial_test::serial;

fn configured_harness(config: foundation_apitest::client::ApiTestClientConfig) -> ApiTestHarness {
    let mut harness = ApiTestHarness::from_config(config);
    harness.register("admin", || {
        vec![Box::new(BasicAuthConfiguration::new("admin", "pw")) as Box<dyn HeaderConfiguration>]
    });
    harness.register("traced", || {
        vec![
            Box::new(HeaderBundle::new("source").set("X-Request-Source", "api-tests"))
                as Box<dyn HeaderConfiguration>,
            Box::new(HeaderBundle::new("time").entry(timestamp_header("X-Timestamp"))),
        ]
    });
    harness
}

/// WHY: Verify declared configurators reach the server on every request
/// WHAT: Tests two configurators over two requests of one run
#[test]
fn test_configurators_over_http() {
    let server = echo_server();
    let harness = configured_harness(config_for(&server));

    let echoed = harness
        .try_run(&["admin", "traced"], |client| {
            let first = client.get(&uri("a"))?.json_value()?;
            let second = client.get(&uri("b"))?.json_value()?;
            Ok(vec![first, second])
        })
        .unwrap();

    for request in &echoed {
        assert_eq!(
            echoed_header(request, "Authorization").as_deref(),
            Some("Basic YWRtaW46cHc=")
        );
        assert_eq!(
            echoed_header(request, "X-Request-Source").as_deref(),
            Some("api-tests")
        );
        assert!(echoed_header(request, "X-Timestamp").is_some());
    }
}

/// WHY: Verify each run starts with only its declared headers
/// WHAT: Tests that headers set in one run are absent in the next
#[test]
fn test_runs_do_not_share_headers() {
    let server = echo_server();
    let harness = configured_harness(config_for(&server));

    harness
        .try_run(&["admin"], |client| {
            client.set_header("X-Leak", "1");
            client.get(&uri("a"))?;
            Ok(())
        })
        .unwrap();

    let echoed = harness
        .try_run(&[] as &[&str], |client| client.get(&uri("b"))?.json_value())
        .unwrap();

    assert_eq!(echoed_header(&echoed, "X-Leak"), None);
    assert_eq!(echoed_header(&echoed, "Authorization"), None);
    assert_eq!(server.requests().len(), 2);
}

/// WHY: Verify unknown configurators fail the setup before any request
/// WHAT: Tests `MissingConfigurator` with a real transport
#[test]
fn test_unknown_configurator() {
    let server = echo_server();
    let harness = configured_harness(config_for(&server));

    let err = harness
        .run(&["admin", "unknown"], |client| client.get(&uri("a")).is_ok())
        .unwrap_err();

    assert!(matches!(err, ApiTestError::MissingConfigurator(_)));
    assert!(server.requests().is_empty());
}

/// WHY: Verify tests can point at the API through the environment
/// WHAT: Tests `ApiTestHarness::from_env` with `API_TEST_ENTRY_POINT`
#[test]
#[serial]
fn test_harness_from_env() {
    let server = echo_server();
    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::set_var(ENTRY_POINT_ENV, server.url("/api"));

    let harness = ApiTestHarness::from_env();
    std::env::remove_var(ENTRY_POINT_ENV);

    let echoed = harness
        .unwrap()
        .try_run(&[] as &[&str], |client| client.get(&uri("ping"))?.json_value())
        .unwrap();
    assert_eq!(echoed["path"], "/api/ping");
}
