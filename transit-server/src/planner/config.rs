//! Tuning for the route finders.

use chrono::Duration;

/// Limits and buffers applied by route search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of direct itineraries to return.
    pub max_direct_results: usize,

    /// Maximum number of single-transfer itineraries to return.
    pub max_transfer_results: usize,

    /// Minimum time between arriving at the transfer stop and the second
    /// bus leaving it (minutes). Tighter connections are rejected.
    pub min_transfer_mins: i64,
}

impl PlannerConfig {
    pub fn new(max_direct_results: usize, max_transfer_results: usize, min_transfer_mins: i64) -> Self {
        Self {
            max_direct_results,
            max_transfer_results,
            min_transfer_mins,
        }
    }

    /// Returns the minimum transfer time as a Duration.
    pub fn min_transfer(&self) -> Duration {
        Duration::minutes(self.min_transfer_mins)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_direct_results: 10,
            max_transfer_results: 5,
            min_transfer_mins: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.max_direct_results, 10);
        assert_eq!(config.max_transfer_results, 5);
        assert_eq!(config.min_transfer(), Duration::minutes(5));
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(3, 2, 0);

        assert_eq!(config.max_direct_results, 3);
        assert_eq!(config.max_transfer_results, 2);
        assert_eq!(config.min_transfer(), Duration::zero());
    }
}
