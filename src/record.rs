//! Notification record types
//!
//! The canonical output shape every resolved row is normalized into. The
//! shape is always complete: fields with no mapped source column default to
//! empty strings, and a missing or unparseable timestamp becomes an explicit
//! invalid marker rather than an absent value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::loader::Scalar;

/// A parsed point in time, or a marker that the stored value was not one.
///
/// Consumers can detect invalid timestamps via [`Timestamp::is_valid`] and,
/// for example, sort such records last. The invalid variant carries the raw
/// stored rendering so the value still shows up in display and filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    Invalid(String),
}

impl Timestamp {
    /// Marker for records whose source table mapped no datetime column
    pub fn missing() -> Self {
        Timestamp::Invalid(String::new())
    }

    /// Parse a stored scalar into a timestamp.
    ///
    /// Accepts RFC 3339 text, common `YYYY-MM-DD HH:MM:SS` shapes, bare
    /// dates, and unix epoch values (integer, float, or numeric text).
    /// Epoch integers below 10^12 are read as seconds, larger ones as
    /// milliseconds. Anything else yields the invalid marker.
    pub fn parse(value: &Scalar) -> Self {
        match value {
            Scalar::Integer(n) => Self::from_epoch(*n),
            Scalar::Real(f) => DateTime::from_timestamp_millis((f * 1000.0) as i64)
                .map(Timestamp::Valid)
                .unwrap_or_else(|| Timestamp::Invalid(f.to_string())),
            Scalar::Text(s) => Self::from_text(s),
            Scalar::Null | Scalar::Blob(_) => Timestamp::Invalid(value.to_display_string()),
        }
    }

    fn from_epoch(n: i64) -> Self {
        let parsed = if n.abs() >= 1_000_000_000_000 {
            DateTime::from_timestamp_millis(n)
        } else {
            DateTime::from_timestamp(n, 0)
        };
        parsed
            .map(Timestamp::Valid)
            .unwrap_or_else(|| Timestamp::Invalid(n.to_string()))
    }

    fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Timestamp::Invalid(s.to_string());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Timestamp::Valid(dt.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Timestamp::Valid(naive.and_utc());
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Timestamp::Valid(naive.and_utc());
            }
        }

        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::from_epoch(n);
        }

        Timestamp::Invalid(s.to_string())
    }

    /// Whether this carries a parsed point in time
    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }

    /// The parsed value, if valid
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Valid(dt) => Some(*dt),
            Timestamp::Invalid(_) => None,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Valid(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Timestamp::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

/// Canonical notification record.
///
/// Every resolved record exposes all five fields. `id` is opaque (whatever
/// the source table stored, coerced to text); an unmapped `id` stays empty
/// rather than getting a generated surrogate, so identity-based operations
/// degrade to full-value matching when the source lacks one. That is a
/// known limitation of schema-unknown sources, not a bug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRecord {
    pub id: String,
    pub app: String,
    pub title: String,
    pub text: String,
    pub datetime: Timestamp,
}

impl NotificationRecord {
    /// An all-defaults record, filled in field by field during row
    /// materialization
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            app: String::new(),
            title: String::new(),
            text: String::new(),
            datetime: Timestamp::missing(),
        }
    }
}
