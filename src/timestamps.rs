//! Lenient timestamp parsing for storage rows.
//!
//! Postgres `timestamptz` columns arrive as RFC 3339, but older rows (and
//! hand-written fixtures) use naive `YYYY-MM-DD HH:MM:SS` forms. Naive
//! values are read as UTC. Anything unparseable is `None`.

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// Parse a storage timestamp; `None` when empty or unparseable.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres text output: "2024-05-01 12:00:00+00"
    if let Ok(dt) = DateTime::parse_from_str(s, NAIVE_FORMATS[2]) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS[..2]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|naive| naive.and_utc())
}

/// Sort key where a missing timestamp counts as the Unix epoch.
pub fn epoch_key(ts: Option<DateTime<Utc>>) -> i64 {
    ts.map(|t| t.timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let t = parse_timestamp("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        let want = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T12:00:00").unwrap(), want);
        assert_eq!(parse_timestamp("2024-05-01 12:00:00.000").unwrap(), want);
        assert_eq!(parse_timestamp("2024-05-01 12:00:00+00").unwrap(), want);
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn missing_sorts_as_epoch() {
        assert_eq!(epoch_key(None), 0);
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(epoch_key(Some(t)), 1000);
    }
}
