//! Time-of-day and timestamp parsing for stored schedule data.
//!
//! Schedules store times of day as `"HH:MM"` or `"HH:MM:SS"`. Report
//! timestamps are RFC 3339; rows written without an offset are UTC.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};

use super::error::DomainError;

/// Parse a time of day in `HH:MM` or `HH:MM:SS` form.
///
/// # Examples
///
/// ```
/// use transit_server::domain::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("07:40").unwrap().to_string(), "07:40:00");
/// assert_eq!(parse_time_of_day("23:59:30").unwrap().to_string(), "23:59:30");
/// assert!(parse_time_of_day("24:00").is_err());
/// assert!(parse_time_of_day("7.40").is_err());
/// ```
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, DomainError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| DomainError::InvalidTimestamp(s.to_string()))
}

/// Parse a stored timestamp into UTC.
///
/// A timestamp carrying an offset is converted to UTC. One without an
/// offset is taken to already be UTC.
///
/// # Examples
///
/// ```
/// use transit_server::domain::parse_timestamp_utc;
///
/// let a = parse_timestamp_utc("2026-10-12T08:30:00+05:30").unwrap();
/// let b = parse_timestamp_utc("2026-10-12T03:00:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_timestamp_utc(s: &str) -> Result<DateTime<Utc>, DomainError> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn time_of_day_formats() {
        let t = parse_time_of_day("08:05").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 5, 0));

        let t = parse_time_of_day("08:05:09").unwrap();
        assert_eq!(t.second(), 9);
    }

    #[test]
    fn time_of_day_rejects_garbage() {
        assert!(parse_time_of_day("").is_err());
        assert!(parse_time_of_day("8").is_err());
        assert!(parse_time_of_day("12:60").is_err());
    }

    #[test]
    fn naive_timestamp_is_utc() {
        let ts = parse_timestamp_utc("2026-10-12 23:45:00").unwrap();
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.to_rfc3339(), "2026-10-12T23:45:00+00:00");
    }

    #[test]
    fn offset_timestamp_is_converted() {
        let ts = parse_timestamp_utc("2026-10-13T01:00:00+05:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-12T19:30:00+00:00");
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(parse_timestamp_utc("yesterday").is_err());
    }
}
