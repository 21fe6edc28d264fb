//! Availability interval value type and its textual codec.
//!
//! The textual form is an ISO-8601 time-interval literal: `<start>/<end>`,
//! e.g. `2024-01-01T00:00:00.000Z/2024-01-02T00:00:00.000Z`. Encoding always
//! emits UTC with millisecond precision; decoding accepts any RFC 3339 offset
//! (normalised to UTC) and offset-less date-times (read as UTC).

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use kitshelf_core::{DomainError, DomainResult, ValueObject};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Earliest storable instant, `0000-01-01T00:00:00.000Z`, in epoch milliseconds.
pub const MIN_INSTANT_MILLIS: i64 = -62_167_219_200_000;

/// Latest storable instant, `9999-12-31T23:59:59.999Z`, in epoch milliseconds.
///
/// Outside four-digit years the RFC 3339 text form needs an expanded year
/// (`+10000-...`) that the decoder does not read back.
pub const MAX_INSTANT_MILLIS: i64 = 253_402_300_799_999;

/// A single availability window.
///
/// `start` is inclusive and `end` is exclusive. Both are kept at millisecond
/// resolution so that encoding and decoding are lossless.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ValueObject for Interval {}

impl Interval {
    /// Build an interval, truncating both endpoints to whole milliseconds.
    ///
    /// Rejects `end < start` and endpoints outside years 0000..=9999. A
    /// zero-length interval is allowed and contains no instant.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        let start = start.trunc_subsecs(3);
        let end = end.trunc_subsecs(3);
        check_range(start.timestamp_millis())?;
        check_range(end.timestamp_millis())?;
        if end < start {
            return Err(DomainError::validation(format!(
                "interval end ({}) precedes start ({})",
                format_instant(end),
                format_instant(start)
            )));
        }
        Ok(Self { start, end })
    }

    /// Build an interval from two epoch-millisecond timestamps (UTC).
    pub fn from_epoch_pair(start_ms: i64, end_ms: i64) -> DomainResult<Self> {
        Self::new(instant_from_millis(start_ms)?, instant_from_millis(end_ms)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// `start <= instant < end`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Canonical `<start>/<end>` literal.
    pub fn encode(&self) -> String {
        format!("{}/{}", format_instant(self.start), format_instant(self.end))
    }

    pub fn to_projection(&self) -> IntervalProjection {
        IntervalProjection {
            interval: self.encode(),
            start: self.start_millis(),
            end: self.end_millis(),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Interval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| DomainError::parse(format!("'{s}' is not a <start>/<end> interval")))?;

        let start = parse_instant(start)?;
        let end = parse_instant(end)?;

        // An inverted literal is unparsable as an interval, not a caller validation issue.
        Interval::new(start, end).map_err(|e| match e {
            DomainError::Validation(msg) => DomainError::parse(format!("'{s}': {msg}")),
            other => other,
        })
    }
}

/// Client-facing view of an interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalProjection {
    /// Canonical `<start>/<end>` literal.
    #[serde(rename = "string")]
    pub interval: String,
    /// Start instant, epoch milliseconds.
    pub start: i64,
    /// End instant, epoch milliseconds.
    pub end: i64,
}

/// Parse a raw epoch-millisecond timestamp as supplied by clients (`"1704067200000"`).
pub fn parse_epoch_millis(raw: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::parse(format!("'{raw}' is not an epoch-millisecond timestamp")))
}

fn check_range(ms: i64) -> DomainResult<()> {
    if (MIN_INSTANT_MILLIS..=MAX_INSTANT_MILLIS).contains(&ms) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "epoch milliseconds {ms} outside 0000-01-01T00:00:00.000Z..=9999-12-31T23:59:59.999Z"
        )))
    }
}

fn instant_from_millis(ms: i64) -> DomainResult<DateTime<Utc>> {
    check_range(ms)?;
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| DomainError::validation(format!("epoch milliseconds {ms} out of range")))
}

fn parse_instant(s: &str) -> DomainResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| DomainError::parse(format!("'{s}' is not an ISO-8601 timestamp")))
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
