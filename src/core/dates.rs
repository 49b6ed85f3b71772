//! Date (de)serialization for persisted invoices
//!
//! Dates are written as `YYYY-MM-DD` (calendar dates) and RFC 3339 (timestamps),
//! but reading is lenient: blobs written by older front-ends contain full
//! ISO-8601 timestamps for calendar dates, or epoch milliseconds.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date as it may appear in a stored blob
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp (UTC date)
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(input).map(|ts| ts.date_naive()))
}

/// Parse an RFC 3339 timestamp, normalised to UTC
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

fn hydrate_timestamp(raw: RawDate) -> Result<DateTime<Utc>, String> {
    match raw {
        RawDate::Millis(ms) => from_millis(ms).ok_or_else(|| format!("timestamp out of range: {ms}")),
        RawDate::Fractional(ms) if ms.is_finite() => from_millis(ms as i64)
            .ok_or_else(|| format!("timestamp out of range: {ms}")),
        RawDate::Fractional(ms) => Err(format!("invalid timestamp: {ms}")),
        RawDate::Text(s) => parse_timestamp(&s)
            .or_else(|| {
                NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
            .ok_or_else(|| format!("invalid timestamp: '{s}'")),
    }
}

fn hydrate_date(raw: RawDate) -> Result<NaiveDate, String> {
    match raw {
        RawDate::Text(s) => parse_date(&s).ok_or_else(|| format!("invalid date: '{s}'")),
        other => hydrate_timestamp(other).map(|ts| ts.date_naive()),
    }
}

/// `#[serde(with)]` module for `NaiveDate` fields
pub mod calendar_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = RawDate::deserialize(deserializer)?;
        hydrate_date(raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with)]` module for `Option<NaiveDate>` fields
pub mod optional_calendar_date {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<RawDate>::deserialize(deserializer)? {
            Some(raw) => hydrate_date(raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// `#[serde(with)]` module for `DateTime<Utc>` fields.
///
/// Written with full sub-second precision so a save/load cycle is lossless.
pub mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = RawDate::deserialize(deserializer)?;
        hydrate_timestamp(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "calendar_date")]
        date: NaiveDate,
        #[serde(with = "timestamp")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_parse_date_plain_and_iso() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(parse_date("2025-01-15"), Some(expected));
        assert_eq!(parse_date("2025-01-15T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_date(" 2025-01-15 "), Some(expected));
        assert_eq!(parse_date("15/01/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_hydrates_iso_strings() {
        let holder: Holder = serde_json::from_value(json!({
            "date": "2025-01-15T00:00:00.000Z",
            "at": "2024-12-01T10:30:00.123Z"
        }))
        .unwrap();
        assert_eq!(holder.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(holder.at.timestamp_millis(), 1_733_049_000_123);
    }

    #[test]
    fn test_iso_due_date_uses_utc_calendar_day() {
        let holder: Holder = serde_json::from_value(json!({
            "date": "2025-01-14T17:00:00.000Z",
            "at": "2025-01-14T17:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(holder.date, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());
        assert_eq!(parse_date("2025-01-15T01:00:00+02:00"), NaiveDate::from_ymd_opt(2025, 1, 14));
    }

    #[test]
    fn test_hydrates_epoch_millis() {
        let holder: Holder = serde_json::from_value(json!({
            "date": 1_736_899_200_000_i64,
            "at": 1_733_049_000_123_i64
        }))
        .unwrap();
        assert_eq!(holder.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(holder.at.timestamp_millis(), 1_733_049_000_123);
    }

    #[test]
    fn test_rejects_garbage() {
        let result: Result<Holder, _> = serde_json::from_value(json!({
            "date": "not a date",
            "at": "2024-12-01T10:30:00Z"
        }));
        assert!(result.is_err());

        let result: Result<Holder, _> = serde_json::from_value(json!({
            "date": "2025-01-15",
            "at": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_round_trip_is_lossless() {
        let holder = Holder {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            at: Utc::now(),
        };
        let text = serde_json::to_string(&holder).unwrap();
        let back: Holder = serde_json::from_str(&text).unwrap();
        assert_eq!(back.date, holder.date);
        assert_eq!(back.at, holder.at);
    }
}
