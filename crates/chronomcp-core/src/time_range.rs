//! Time range arguments.
//!
//! Tools that query a window of data accept either absolute bounds
//! (`start`, `end` as RFC 3339) or a relative `duration` ending at `end`
//! (default: now). With neither, the window is the last hour.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::params::{self, ToolArgs};

pub const START_PARAM: &str = "start";
pub const END_PARAM: &str = "end";
pub const DURATION_PARAM: &str = "duration";

/// Window used when a tool call names no bounds.
pub const DEFAULT_LOOKBACK: Duration = Duration::hours(1);

/// Closed interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_argument(
                START_PARAM,
                format!(
                    "start ({}) must not be after end ({})",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                ),
            ));
        }
        Ok(Self { start, end })
    }

    /// The `lookback` window ending at `end`.
    pub fn ending_at(end: DateTime<Utc>, lookback: Duration) -> Result<Self> {
        Self::new(end - lookback, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Parse the time range of a tool call relative to the current instant.
pub fn parse_time_range(args: &ToolArgs) -> Result<TimeRange> {
    parse_time_range_at(args, Utc::now(), DEFAULT_LOOKBACK)
}

/// Parse the time range of a tool call relative to `now`.
pub fn parse_time_range_at(
    args: &ToolArgs,
    now: DateTime<Utc>,
    default_lookback: Duration,
) -> Result<TimeRange> {
    let start = params::optional_string(args, START_PARAM)?;
    let end = params::optional_string(args, END_PARAM)?;
    let duration = params::optional_string(args, DURATION_PARAM)?;

    let end = match end {
        Some(raw) => parse_instant(END_PARAM, &raw)?,
        None if start.is_some() => {
            return Err(Error::invalid_argument(
                END_PARAM,
                "is required when start is set",
            ))
        }
        None => now,
    };

    match (start, duration) {
        (Some(_), Some(_)) => Err(Error::invalid_argument(
            DURATION_PARAM,
            "cannot be combined with start",
        )),
        (Some(raw), None) => TimeRange::new(parse_instant(START_PARAM, &raw)?, end),
        (None, Some(raw)) => {
            let lookback = parse_duration(&raw)
                .map_err(|reason| Error::invalid_argument(DURATION_PARAM, reason))?;
            TimeRange::ending_at(end, lookback)
        }
        (None, None) => TimeRange::ending_at(end, default_lookback),
    }
}

fn parse_instant(name: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::invalid_argument(name, format!("not an RFC 3339 timestamp: {e}")))
}

/// Parse a signed duration such as `1h30m`, `-15m`, `1.5h` or `500ms`.
///
/// Units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`, `d`. A bare `0` is allowed.
pub fn parse_duration(raw: &str) -> std::result::Result<Duration, String> {
    let input = raw.trim();
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(format!("invalid duration {raw:?}"));
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(format!("invalid duration {raw:?}"));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid duration {raw:?}"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = unit_nanos(unit)
            .ok_or_else(|| format!("unknown unit {unit:?} in duration {raw:?}"))?;

        total_nanos += value * scale;
        rest = tail;
    }

    if total_nanos > i64::MAX as f64 {
        return Err(format!("duration {raw:?} is out of range"));
    }
    let nanos = total_nanos.round() as i64;
    Ok(Duration::nanoseconds(if negative { -nanos } else { nanos }))
}

fn unit_nanos(unit: &str) -> Option<f64> {
    let nanos = match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60.0 * 1e9,
        "h" => 3600.0 * 1e9,
        "d" => 86_400.0 * 1e9,
        _ => return None,
    };
    Some(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            _ => panic!("test args must be an object"),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("-15m").unwrap(), Duration::minutes(-15));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::milliseconds(500));
        assert_eq!(parse_duration("2d").unwrap(), Duration::hours(48));
        assert_eq!(parse_duration("0").unwrap(), Duration::zero());
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("10y").is_err());
        assert!(parse_duration("-").is_err());
    }

    #[test]
    fn test_absolute_range() {
        let a = args(json!({
            "start": "2024-05-01T10:00:00Z",
            "end": "2024-05-01T11:00:00+00:00",
        }));
        let range = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(range.duration(), Duration::hours(1));
        assert_eq!(range.end(), Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_equal_bounds_are_allowed() {
        let a = args(json!({
            "start": "2024-05-01T10:00:00Z",
            "end": "2024-05-01T10:00:00Z",
        }));
        let range = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(range.duration(), Duration::zero());
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let a = args(json!({
            "start": "2024-05-01T11:00:00Z",
            "end": "2024-05-01T10:00:00Z",
        }));
        let err = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap_err();
        assert!(err.to_string().contains("must not be after"));
    }

    #[test]
    fn test_duration_defaults_end_to_now() {
        let a = args(json!({"duration": "30m"}));
        let range = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(range.end(), now());
        assert_eq!(range.start(), now() - Duration::minutes(30));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let a = args(json!({"duration": "-30m"}));
        assert!(parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).is_err());
    }

    #[test]
    fn test_start_and_duration_conflict() {
        let a = args(json!({
            "start": "2024-05-01T10:00:00Z",
            "end": "2024-05-01T11:00:00Z",
            "duration": "1h",
        }));
        let err = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_start_without_end_is_rejected() {
        let a = args(json!({"start": "2024-05-01T10:00:00Z"}));
        let err = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap_err();
        assert!(err.to_string().contains("\"end\""));
    }

    #[test]
    fn test_no_bounds_uses_default_lookback() {
        let range = parse_time_range_at(&ToolArgs::new(), now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(range.duration(), DEFAULT_LOOKBACK);
    }

    #[test]
    fn test_bad_timestamp_names_parameter() {
        let a = args(json!({"start": "yesterday", "end": "2024-05-01T10:00:00Z"}));
        let err = parse_time_range_at(&a, now(), DEFAULT_LOOKBACK).unwrap_err();
        assert!(err.to_string().contains("\"start\""));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_parsed_ranges_are_ordered(a in 0i64..4_000_000_000, b in 0i64..4_000_000_000) {
            let start = Utc.timestamp_opt(a, 0).unwrap();
            let end = Utc.timestamp_opt(b, 0).unwrap();
            let input = args(json!({"start": start.to_rfc3339(), "end": end.to_rfc3339()}));
            match parse_time_range_at(&input, now(), DEFAULT_LOOKBACK) {
                Ok(range) => prop_assert!(range.start() <= range.end()),
                Err(_) => prop_assert!(a > b),
            }
        }

        #[test]
        fn prop_duration_minutes_round_trip(m in 0i64..100_000) {
            prop_assert_eq!(parse_duration(&format!("{m}m")).unwrap(), Duration::minutes(m));
        }
    }
}
