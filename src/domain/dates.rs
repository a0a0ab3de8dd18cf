use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::{ReconcileError, Result};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a sheet timestamp. Sheets mix ISO timestamps with US-style form timestamps.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();

    // RFC3339 (with timezone)
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    Err(ReconcileError::invalid_format(format!(
        "Failed to parse timestamp: {}",
        raw
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sheet_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(18, 5, 0)
            .unwrap();

        for raw in [
            "2024-03-09T18:05:00Z",
            "2024-03-09T18:05:00",
            "2024-03-09 18:05:00",
            "3/9/2024 18:05:00",
            " 03/09/2024 18:05 ",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn date_only_is_midnight() {
        let parsed = parse_timestamp("2024-03-09").unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn garbage_is_invalid_format() {
        assert!(matches!(
            parse_timestamp("yesterday-ish"),
            Err(ReconcileError::InvalidFormat(_))
        ));
    }
}
