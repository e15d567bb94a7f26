//! # Timestamp Converter — Unix Epoch ⇄ ISO 8601
//!
//! `Timestamp` is a UTC-only instant truncated to seconds precision. It
//! renders as `YYYY-MM-DDTHH:MM:SSZ`: no sub-seconds, no `+00:00`, always
//! `Z`.
//!
//! Parsing is lenient about offsets (`+05:00` is converted to UTC) and
//! strict about everything else: non-numeric epoch text, out-of-range
//! epochs and unparseable dates are rejected.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Unit of a numeric epoch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpochUnit {
    /// Seconds since 1970-01-01T00:00:00Z.
    #[default]
    Seconds,
    /// Milliseconds since 1970-01-01T00:00:00Z.
    Milliseconds,
}

impl FromStr for EpochUnit {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(Self::Milliseconds),
            other => Err(ToolError::Unsupported(format!("unknown epoch unit {other:?}"))),
        }
    }
}

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// From a Unix epoch value in seconds.
    ///
    /// # Errors
    ///
    /// [`ToolError::Range`] if the instant is not representable.
    pub fn from_epoch_secs(secs: i64) -> Result<Self> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ToolError::Range(format!("Unix timestamp {secs} is out of range")))
    }

    /// From a Unix epoch value in milliseconds, truncating to seconds.
    pub fn from_epoch_millis(millis: i64) -> Result<Self> {
        Self::from_epoch_secs(millis.div_euclid(1000))
    }

    /// Parse an RFC 3339 string, converting any offset to UTC. Also accepts
    /// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`, which
    /// are taken as UTC.
    ///
    /// # Errors
    ///
    /// [`ToolError::MalformedInput`] if none of the accepted forms match.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }
        for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self(naive.and_utc()));
            }
        }
        Err(ToolError::malformed(
            "timestamp",
            format!("{s:?} is not an ISO 8601 / RFC 3339 date-time"),
        ))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Unix epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2024-01-01T00:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Render as RFC 2822 (e.g. `Mon, 1 Jan 2024 00:00:00 +0000`).
    pub fn to_rfc2822(&self) -> String {
        self.0.to_rfc2822()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Every rendering the timestamp tool shows for one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampReport {
    /// Unix seconds.
    pub unix_seconds: i64,
    /// Unix milliseconds.
    pub unix_millis: i64,
    /// ISO 8601 UTC.
    pub iso8601: String,
    /// RFC 2822.
    pub rfc2822: String,
}

impl From<Timestamp> for TimestampReport {
    fn from(ts: Timestamp) -> Self {
        Self {
            unix_seconds: ts.epoch_secs(),
            unix_millis: ts.epoch_millis(),
            iso8601: ts.to_iso8601(),
            rfc2822: ts.to_rfc2822(),
        }
    }
}

/// Convert Unix epoch seconds to an ISO 8601 UTC string.
pub fn unix_to_iso(secs: i64) -> Result<String> {
    Ok(Timestamp::from_epoch_secs(secs)?.to_iso8601())
}

/// Parse an ISO 8601 / RFC 3339 string into Unix epoch seconds.
pub fn iso_to_unix(text: &str) -> Result<i64> {
    Ok(Timestamp::parse(text)?.epoch_secs())
}

/// Parse epoch text (as typed into a UI field) into a [`Timestamp`].
///
/// # Errors
///
/// [`ToolError::MalformedInput`] for anything that is not an optionally
/// signed decimal integer; [`ToolError::Range`] for unrepresentable values.
pub fn parse_epoch(text: &str, unit: EpochUnit) -> Result<Timestamp> {
    let trimmed = text.trim();
    let value: i64 = trimmed.parse().map_err(|_| {
        ToolError::malformed("timestamp", format!("{trimmed:?} is not an integer epoch value"))
    })?;
    match unit {
        EpochUnit::Seconds => Timestamp::from_epoch_secs(value),
        EpochUnit::Milliseconds => Timestamp::from_epoch_millis(value),
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_year_2024() {
        assert_eq!(unix_to_iso(1_704_067_200).unwrap(), "2024-01-01T00:00:00Z");
        assert!(unix_to_iso(1_704_067_200).unwrap().contains("2024"));
    }

    #[test]
    fn epoch_and_before() {
        assert_eq!(unix_to_iso(0).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(unix_to_iso(-1).unwrap(), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn crosses_leap_day() {
        assert_eq!(unix_to_iso(951_782_400).unwrap(), "2000-02-29T00:00:00Z");
        assert_eq!(unix_to_iso(951_868_799).unwrap(), "2000-02-29T23:59:59Z");
        assert_eq!(unix_to_iso(951_868_800).unwrap(), "2000-03-01T00:00:00Z");
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(unix_to_iso(i64::MAX).unwrap_err().kind(), "range_error");
    }

    #[test]
    fn iso_to_unix_inverse() {
        assert_eq!(iso_to_unix("2024-01-01T00:00:00Z").unwrap(), 1_704_067_200);
        assert_eq!(iso_to_unix("2024-01-01T05:30:00+05:30").unwrap(), 1_704_067_200);
        assert_eq!(iso_to_unix("2024-01-01 00:00:00").unwrap(), 1_704_067_200);
        assert_eq!(iso_to_unix("2024-01-01").unwrap(), 1_704_067_200);
    }

    #[test]
    fn iso_to_unix_rejects_garbage() {
        assert!(iso_to_unix("not-a-date").is_err());
        assert!(iso_to_unix("2024-13-01T00:00:00Z").is_err());
        assert!(iso_to_unix("").is_err());
    }

    #[test]
    fn parse_epoch_text() {
        let ts = parse_epoch(" 1704067200 ", EpochUnit::Seconds).unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-01T00:00:00Z");
        let ms = parse_epoch("1704067200999", EpochUnit::Milliseconds).unwrap();
        assert_eq!(ms, ts);
        assert_eq!(parse_epoch("12ab", EpochUnit::Seconds).unwrap_err().kind(), "malformed_input");
        assert!(parse_epoch("1.5", EpochUnit::Seconds).is_err());
    }

    #[test]
    fn subseconds_truncated() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
        let parsed = Timestamp::parse("2026-01-15T12:30:45.999Z").unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn report_renders_all_forms() {
        let report = TimestampReport::from(Timestamp::from_epoch_secs(1_704_067_200).unwrap());
        assert_eq!(report.unix_millis, 1_704_067_200_000);
        assert_eq!(report.iso8601, "2024-01-01T00:00:00Z");
        assert_eq!(report.rfc2822, "Mon, 1 Jan 2024 00:00:00 +0000");
    }

    #[test]
    fn unit_parse() {
        assert_eq!("ms".parse::<EpochUnit>().unwrap(), EpochUnit::Milliseconds);
        assert_eq!("Seconds".parse::<EpochUnit>().unwrap(), EpochUnit::Seconds);
        assert!("fortnights".parse::<EpochUnit>().is_err());
    }

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }
}
