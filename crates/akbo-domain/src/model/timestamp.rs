//! Timestamp - A timezone-aware instant
//!
//! Naive date-times are not representable. They can only appear at the text
//! boundary, where [`Timestamp::parse`] rejects them.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A point in time with a known UTC offset.
///
/// Equality and ordering compare the instant, so `09:00+09:00` equals
/// `00:00+00:00`. The offset it was given is kept for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Parse ISO-8601 / RFC 3339 text that carries an offset.
    ///
    /// `field` names the value in the error when the text is naive.
    pub fn parse(text: &str, field: &str) -> DomainResult<Self> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%:z") {
            return Ok(Self(dt));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
            || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();

        if naive {
            Err(DomainError::timezone_required(field))
        } else {
            Err(DomainError::InvalidTimestamp {
                field: field.to_string(),
                value: text.to_string(),
            })
        }
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// ISO-8601 rendering with the stored offset, e.g. `2025-01-01T00:00:00+09:00`.
    ///
    /// Fractions are written as six digits (microseconds) and left out when
    /// there are none. Sub-microsecond digits are truncated.
    pub fn to_iso8601(&self) -> String {
        let format = if self.0.nanosecond() / 1_000 == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        self.0.to_rfc3339_opts(format, false)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(dt.fixed_offset())
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0 + rhs)
    }
}

impl std::ops::Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0 - rhs)
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text, "timestamp").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_parse_keeps_offset() {
        let ts = Timestamp::parse("2025-01-01T00:00:00+09:00", "now").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-01T00:00:00+09:00");
        assert_eq!(ts.as_datetime().offset(), &kst());
    }

    #[test]
    fn test_parse_rejects_naive() {
        for text in ["2025-01-01T00:00:00", "2025-01-01 12:30:00.250", "2025-01-01"] {
            let err = Timestamp::parse(text, "occurred_at").unwrap_err();
            assert_eq!(err, DomainError::timezone_required("occurred_at"), "{}", text);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Timestamp::parse("yesterday", "now").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_equality_is_by_instant() {
        let seoul: Timestamp = kst().with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap().into();
        let utc: Timestamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into();

        assert_eq!(seoul, utc);
        assert!(seoul + Duration::seconds(1) > utc);
    }

    #[test]
    fn test_fraction_is_rendered_in_microseconds() {
        let ms = Timestamp::parse("2025-01-01T00:00:00.123+09:00", "now").unwrap();
        assert_eq!(ms.to_iso8601(), "2025-01-01T00:00:00.123000+09:00");

        let us = Timestamp::parse("2025-01-01T00:00:00.000042Z", "now").unwrap();
        assert_eq!(us.to_iso8601(), "2025-01-01T00:00:00.000042+00:00");
    }

    #[test]
    fn test_sub_microsecond_digits_are_dropped() {
        let ns = Timestamp::parse("2025-01-01T00:00:00.000000001+00:00", "now").unwrap();
        assert_eq!(ns.to_iso8601(), "2025-01-01T00:00:00+00:00");

        let mixed = Timestamp::parse("2025-01-01T00:00:00.123456789+00:00", "now").unwrap();
        assert_eq!(mixed.to_iso8601(), "2025-01-01T00:00:00.123456+00:00");
    }

    #[test]
    fn test_serde_uses_iso_string() {
        let ts: Timestamp = kst().with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap().into();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-03-01T12:00:00+09:00\"");

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);

        assert!(serde_json::from_str::<Timestamp>("\"2025-03-01T12:00:00\"").is_err());
    }
}
