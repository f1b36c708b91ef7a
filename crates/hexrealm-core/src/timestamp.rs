//! Point-in-time value serialized as RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// An immutable instant carried by commands and event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTimestamp` if the string is malformed.
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| ValueError::InvalidTimestamp(value.to_owned()))
    }

    /// Returns the wrapped UTC date-time.
    #[must_use]
    pub const fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Formats as RFC 3339 with second precision where possible.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_and_format_round_trip() {
        let ts = Timestamp::parse("2026-01-15T10:00:00Z").unwrap();

        assert_eq!(ts.to_rfc3339(), "2026-01-15T10:00:00Z");
        assert_eq!(
            ts.as_datetime(),
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_normalizes_offsets_to_utc() {
        let ts = Timestamp::parse("2026-01-15T12:00:00+02:00").unwrap();

        assert_eq!(ts.to_rfc3339(), "2026-01-15T10:00:00Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Timestamp::parse("yesterday"),
            Err(ValueError::InvalidTimestamp("yesterday".to_owned()))
        );
    }

    #[test]
    fn test_serializes_as_rfc3339_string() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap());

        let json = serde_json::to_value(ts).unwrap();

        assert!(json.as_str().unwrap().starts_with("2026-03-01T08:30:00"));
    }
}
