//! Distance-based fare schedules.

use serde::Serialize;

/// Pricing parameters for one bus class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareSchedule {
    /// Fare charged up to and including `initial_km`, in whole rupees.
    pub min_fare: u32,
    /// Distance covered by the minimum fare.
    pub initial_km: f64,
    /// Charge per kilometre beyond `initial_km`, in paise.
    pub per_km_paise: u32,
}

impl FareSchedule {
    /// Fare in whole rupees for a trip of `distance_km`.
    ///
    /// Fractional rupees are rounded half to even, so 10.5 becomes 10 and
    /// 11.5 becomes 12.
    pub fn fare(&self, distance_km: f64) -> u32 {
        if distance_km <= self.initial_km {
            return self.min_fare;
        }
        let extra = (distance_km - self.initial_km) * f64::from(self.per_km_paise) / 100.0;
        let total = (f64::from(self.min_fare) + extra).round_ties_even();
        // non-negative and far below u32::MAX for any road distance
        total as u32
    }
}

/// Fare schedules for ordinary and limited-stop buses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareTable {
    pub ordinary: FareSchedule,
    pub limited_stop: FareSchedule,
}

impl FareTable {
    pub fn schedule(&self, is_limited_stop: bool) -> &FareSchedule {
        if is_limited_stop {
            &self.limited_stop
        } else {
            &self.ordinary
        }
    }

    /// Fare in whole rupees for a bus class and distance.
    pub fn fare(&self, distance_km: f64, is_limited_stop: bool) -> u32 {
        self.schedule(is_limited_stop).fare(distance_km)
    }
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            ordinary: FareSchedule {
                min_fare: 10,
                initial_km: 2.5,
                per_km_paise: 100,
            },
            limited_stop: FareSchedule {
                min_fare: 15,
                initial_km: 5.0,
                per_km_paise: 105,
            },
        }
    }
}
