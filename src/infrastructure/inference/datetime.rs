//! Lenient datetime decoding for inference server payloads.
//!
//! The server serialises timestamps from dataframes, so the same field may
//! arrive as an RFC 3339 string, a naive `YYYY-MM-DD HH:MM:SS` string, a bare
//! date, or an epoch number. Naive values are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde_json::Value;

/// Epoch values above this are milliseconds, below it seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() > EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// `deserialize_with` target for datetime fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_datetime(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognised datetime '{}'", raw))),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .and_then(from_epoch)
            .ok_or_else(|| de::Error::custom(format!("epoch value out of range: {}", number))),
        other => Err(de::Error::custom(format!(
            "expected datetime string or epoch number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap()
    }

    #[test]
    fn test_string_formats() {
        for raw in [
            "2025-06-01T13:00:00Z",
            "2025-06-01T15:00:00+02:00",
            "2025-06-01T13:00:00",
            "2025-06-01 13:00:00",
            "2025-06-01 13:00:00.000",
            "2025-06-01 13:00:00+00:00",
            "2025-06-01 13:00",
        ] {
            assert_eq!(parse_datetime(raw), Some(expected()), "failed on {}", raw);
        }
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            parse_datetime("2025-06-01"),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_epoch_seconds_and_millis() {
        let secs = expected().timestamp();
        assert_eq!(from_epoch(secs), Some(expected()));
        assert_eq!(from_epoch(secs * 1000), Some(expected()));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(parse_datetime("yesterday"), None);

        #[derive(Debug, Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize")]
            #[allow(dead_code)]
            datetime: DateTime<Utc>,
        }
        assert!(serde_json::from_str::<Row>(r#"{"datetime": true}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"datetime": 1748782800000}"#).is_ok());
    }
}
