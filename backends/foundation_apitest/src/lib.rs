//! Header resolution and request execution helpers for testing REST APIs.
//!
//! This crate provides:
//! - **Header entries**: pending SET / REPLACE / REMOVE operations scoped to the
//!   next request or to every remaining request of a test
//! - **Headers manager**: folds pending operations into the exact header set of
//!   the next outgoing request and carries all-requests entries forward
//! - **Header configurations**: reusable named bundles (basic auth, timestamps, ...)
//!   located through an explicit registry
//! - **API test client**: builds requests against an entry point, applies the
//!   resolved headers and delegates to a pluggable blocking transport
//! - **Test harness**: per-test setup and guaranteed transport release
//!
//! # Examples
//!
//! ```rust
//! use foundation_apitest::client::{uri, ApiTestClient, RecordingTransport};
//!
//! let transport = RecordingTransport::new();
//! let mut client = ApiTestClient::with_transport("http://api.local/v1", transport.connect());
//!
//! client.set_header("X-Tenant", "acme");
//! client.set_header_for_next_request("X-Trace", "abc");
//!
//! let response = client.get(&uri("users")).unwrap();
//! assert_eq!(response.status(), 200);
//!
//! let sent = transport.requests();
//! assert_eq!(sent[0].url, "http://api.local/v1/users");
//! assert_eq!(sent[0].headers.get("X-Trace"), Some("abc"));
//! ```

pub mod client;
mod errors;
pub mod harness;
pub mod headers;

pub use errors::*;
