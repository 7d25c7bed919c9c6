//! Reusable test infrastructure for HTTP clients.
//!
//! This crate provides:
//! - **Test HTTP server**: a real localhost server answering with a
//!   configurable handler and recording the requests it receives
//!
//! # Examples
//!
//! ```rust
//! use foundation_testing::http::{HttpResponse, TestHttpServer};
//!
//! let server = TestHttpServer::with_response(|req| {
//!     HttpResponse::json(format!(r#"{{"path":"{}"}}"#, req.path_only()))
//! });
//!
//! assert!(server.url("/users").ends_with("/users"));
//! assert!(server.requests().is_empty());
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod http;
