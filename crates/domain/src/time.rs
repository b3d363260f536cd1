//! Timestamps and their text form for storage.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for entry creation, snapshots and events.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// RFC 3339 text with millisecond precision, as persisted by storage adapters.
#[must_use]
pub fn to_text(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the text produced by [`to_text`].
///
/// # Errors
///
/// Returns a [`chrono::ParseError`] for malformed input.
pub fn from_text(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}
