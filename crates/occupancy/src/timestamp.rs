use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Shown in place of a time that could not be parsed.
pub const NOT_AVAILABLE: &str = "n/a";

const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// ISO-8601 date-times RFC 3339 rejects: no seconds, or an hour-only offset.
const OFFSET_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a node timestamp.
///
/// Accepts RFC 3339, RFC 2822, ISO-8601 date-times with optional seconds and
/// an optional offset (taken as local time when absent) and bare dates (taken
/// as UTC midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Time of day of `raw` in the local zone, or [`NOT_AVAILABLE`].
#[must_use]
pub fn last_update(raw: &str) -> String {
    last_update_in(raw, &Local)
}

/// Time of day of `raw` in `tz`, or [`NOT_AVAILABLE`].
#[must_use]
pub fn last_update_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    parse_timestamp(raw).map_or_else(
        || NOT_AVAILABLE.to_string(),
        |at| at.with_timezone(tz).format(TIME_OF_DAY_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_parse_rfc3339_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T11:00:00+01:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01T10:00:00.123456+00:00").map(|t| t.timestamp()),
            Some(expected.timestamp())
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(
            parse_timestamp("Mon, 01 Jan 2024 10:00:00 +0000"),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_naive_forms() {
        assert!(parse_timestamp("2024-01-01T10:00:00").is_some());
        assert!(parse_timestamp("2024-01-01 10:00:00.5").is_some());
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_without_seconds() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-01T10:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T11:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:00Z"), Some(expected));
        assert_eq!(last_update_in("2024-01-01T10:00Z", &Utc), "10:00:00");

        let local = parse_timestamp("2024-01-01T10:00").unwrap();
        assert_eq!(
            local.with_timezone(&Local).format("%H:%M").to_string(),
            "10:00"
        );
    }

    #[test]
    fn test_parse_short_offsets() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-01T12:00:00+02"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:00:00+0200"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01 10:00:00.250Z").map(|t| t.timestamp()),
            Some(expected.timestamp())
        );
    }

    #[test]
    fn test_unparseable_is_not_available() {
        for raw in ["", "   ", "yesterday", "2024-13-45T99:00:00Z", "12345"] {
            assert_eq!(parse_timestamp(raw), None, "{raw}");
            assert_eq!(last_update(raw), NOT_AVAILABLE, "{raw}");
        }
    }

    #[test]
    fn test_last_update_uses_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(last_update_in("2024-01-01T10:00:00Z", &Utc), "10:00:00");
        assert_eq!(last_update_in("2024-01-01T10:00:00Z", &plus_two), "12:00:00");
    }
}
