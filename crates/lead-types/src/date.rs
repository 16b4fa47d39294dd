use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date-time layouts with an explicit offset that RFC 3339 rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

/// Naive date-time layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The recency timestamp of a lead record.
///
/// Only used for "is this record newer" decisions. A record without the
/// field, or with a value that does not parse, still takes part in
/// deduplication; how it compares is governed by [`UndatedPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryDate {
    /// A valid instant.
    At(DateTime<Utc>),
    /// The field is absent or `null`.
    Missing,
    /// The field is present but could not be parsed.
    Invalid,
}

impl EntryDate {
    /// Parse an entry date from a field value.
    ///
    /// Strings may be RFC 3339 timestamps, offset or `Z` date-times with
    /// minute precision, naive `YYYY-MM-DD[T ]HH:MM[:SS]` date-times, or the
    /// date forms `YYYY-MM-DD`, `YYYY-MM`, and `YYYY`. Naive forms are taken
    /// as UTC and dates as UTC midnight of their first day. Numbers are
    /// milliseconds since the Unix epoch.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(s)) => Self::parse_str(s),
            Some(Value::Number(n)) => {
                let millis = n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
                millis
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map_or(Self::Invalid, Self::At)
            }
            Some(_) => Self::Invalid,
        }
    }

    /// Parse an entry date from text.
    pub fn parse_str(s: &str) -> Self {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Self::At(dt.with_timezone(&Utc));
        }
        for format in OFFSET_DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Self::At(dt.with_timezone(&Utc));
            }
        }

        let zulu = s.strip_suffix('Z').or_else(|| s.strip_suffix('z'));
        if let Some(naive) = zulu.and_then(parse_naive_datetime) {
            return Self::At(naive.and_utc());
        }
        if let Some(naive) = parse_naive_datetime(s) {
            return Self::At(naive.and_utc());
        }

        parse_date(s)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or(Self::Invalid, |naive| Self::At(naive.and_utc()))
    }

    /// The instant, if the date is valid.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(dt) => Some(*dt),
            Self::Missing | Self::Invalid => None,
        }
    }

    /// Returns `true` if the date is a valid instant.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Returns `true` if this date is strictly newer than `other`.
    ///
    /// Equal instants are never newer. Undated sides follow `policy`.
    pub fn is_newer_than(&self, other: &Self, policy: UndatedPolicy) -> bool {
        match (self, other) {
            (Self::At(a), Self::At(b)) => a > b,
            (Self::At(_), _) => policy == UndatedPolicy::Oldest,
            _ => false,
        }
    }
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

/// Full dates, plus the reduced `YYYY-MM` and `YYYY` forms.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    match s.len() {
        7 => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok(),
        4 if s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        }
        _ => None,
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Missing => f.write_str("missing"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

/// How a missing or unparsable entry date takes part in recency comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UndatedPolicy {
    /// Any comparison involving an undated record is "not newer". An undated
    /// record never replaces, and is never replaced by, a matching record.
    #[default]
    NeverNewer,
    /// Undated records sort before every dated record, so any dated record
    /// replaces a matching undated one.
    Oldest,
}

impl fmt::Display for UndatedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverNewer => f.write_str("never-newer"),
            Self::Oldest => f.write_str("oldest"),
        }
    }
}
