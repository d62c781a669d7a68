//! Weekday parsing at the persistence boundary.
//!
//! Service days are stored either by name (`"monday"`) or by index, with
//! 0 = Monday through 6 = Sunday.

use chrono::Weekday;

use super::error::DomainError;

/// Parse a persisted weekday value.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use transit_server::domain::parse_weekday;
///
/// assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
/// assert_eq!(parse_weekday("Sun").unwrap(), Weekday::Sun);
/// assert_eq!(parse_weekday("4").unwrap(), Weekday::Fri);
/// assert!(parse_weekday("7").is_err());
/// ```
pub fn parse_weekday(s: &str) -> Result<Weekday, DomainError> {
    let trimmed = s.trim();
    if let Ok(idx) = trimmed.parse::<u8>() {
        return Weekday::try_from(idx).map_err(|_| DomainError::InvalidWeekday(s.to_string()));
    }
    trimmed
        .parse::<Weekday>()
        .map_err(|_| DomainError::InvalidWeekday(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_in_any_case() {
        assert_eq!(parse_weekday("wednesday").unwrap(), Weekday::Wed);
        assert_eq!(parse_weekday("SATURDAY").unwrap(), Weekday::Sat);
        assert_eq!(parse_weekday("tue").unwrap(), Weekday::Tue);
    }

    #[test]
    fn indices_are_monday_based() {
        assert_eq!(parse_weekday("0").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("6").unwrap(), Weekday::Sun);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_weekday("funday"),
            Err(DomainError::InvalidWeekday("funday".into()))
        );
        assert!(parse_weekday("").is_err());
        assert!(parse_weekday("12").is_err());
        // one past Sunday
        assert_eq!(parse_weekday("7"), Err(DomainError::InvalidWeekday("7".into())));
    }
}
