//! `Authorization` header for Basic Authentication.

use crate::headers::{HeaderConfiguration, HeaderEntry};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const AUTHORIZATION: &str = "Authorization";

/// Encodes `user:password` into a Basic Authentication header value.
#[must_use]
pub fn basic_auth_value(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// SET entry of the `Authorization` header for the given credentials.
#[must_use]
pub fn basic_auth_header(user: &str, password: &str) -> HeaderEntry {
    HeaderEntry::set(AUTHORIZATION, basic_auth_value(user, password))
}

/// Configuration holding one Basic Authentication header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthConfiguration {
    user: String,
    password: String,
}

impl BasicAuthConfiguration {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl HeaderConfiguration for BasicAuthConfiguration {
    fn name(&self) -> &str {
        "basic-auth"
    }

    fn header_operations(&self) -> Vec<HeaderEntry> {
        vec![basic_auth_header(&self.user, &self.password)]
    }
}
