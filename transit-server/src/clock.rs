//! Source of the current instant in the service timezone.
//!
//! Handlers read the clock exactly once per request and pass the resulting
//! instant down, so every check in one request agrees on "now".

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Supplies the current timezone-aware instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;

    /// The zone all schedule times are expressed in.
    fn timezone(&self) -> Tz;
}

/// Wall clock in a configured zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn timezone(&self) -> Tz {
        self.tz
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Tz>,
}

impl FixedClock {
    /// Fix the clock at a local wall time, e.g. `"2026-10-19 06:50"`.
    ///
    /// Returns `None` for unparseable input or a local time that does not
    /// exist in `tz`.
    pub fn at_local(tz: Tz, local: &str) -> Option<Self> {
        let naive = chrono::NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M").ok()?;
        let instant = tz.from_local_datetime(&naive).single()?;
        Some(Self { instant })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.instant
    }

    fn timezone(&self) -> Tz {
        self.instant.timezone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn fixed_clock_at_local_time() {
        let clock = FixedClock::at_local(chrono_tz::Asia::Kolkata, "2026-10-19 06:50").unwrap();
        let now = clock.now();
        assert_eq!(now.weekday(), Weekday::Mon);
        assert_eq!((now.hour(), now.minute()), (6, 50));
        assert_eq!(clock.timezone(), chrono_tz::Asia::Kolkata);
        assert_eq!(now.with_timezone(&Utc).hour(), 1);
    }

    #[test]
    fn fixed_clock_rejects_garbage() {
        assert!(FixedClock::at_local(chrono_tz::UTC, "tomorrow").is_none());
    }

    #[test]
    fn system_clock_uses_configured_zone() {
        let clock = SystemClock::new(chrono_tz::Europe::London);
        assert_eq!(clock.now().timezone(), chrono_tz::Europe::London);
    }
}
