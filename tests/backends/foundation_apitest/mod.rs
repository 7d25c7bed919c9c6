#![cfg(test)]

pub mod client_http;
pub mod harness_flow;
pub mod header_resolution;

mod support;
