//! UTC timestamps for signed and time-stamped requests.
//!
//! Timestamps use the ISO 8601 form `yyyy-MM-ddTHH:mm:ssZ`, second precision.

use crate::headers::HeaderEntry;
use chrono::{DateTime, Utc};

pub const UTC_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Formats the given instant as a UTC timestamp.
#[must_use]
pub fn format_utc_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(UTC_TIMESTAMP_FORMAT).to_string()
}

/// Current UTC timestamp.
#[must_use]
pub fn utc_timestamp() -> String {
    format_utc_timestamp(&Utc::now())
}

/// SET entry whose value is the UTC time the request is prepared at.
#[must_use]
pub fn timestamp_header(name: impl Into<String>) -> HeaderEntry {
    HeaderEntry::computed(name, |_| Ok(utc_timestamp()))
}
