//! HTTP test server utilities.
//!
//! WHY: Provides real HTTP test server built on stdlib TCP.
//! Avoids external dependencies by using hand-crafted HTTP/1.1 parsing and responses.
//!
//! WHAT: `TestHttpServer` for integration testing HTTP clients.
//!
//! HOW: Uses stdlib's `TcpListener` with one request per connection.

mod server;

pub use server::{HttpRequest, HttpResponse, TestHttpServer};
