//! Linear per-minute fare model for trip quotes.

/// Default rate in currency units per minute of estimated trip time.
pub const PER_MINUTE_RATE: f64 = 0.5;

/// Fare policy applied to estimated trip durations.
///
/// The whole model is one linear term: no base fare, no distance component,
/// no surge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FareSchedule {
    /// Currency units charged per minute of total trip time.
    pub per_minute_rate: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            per_minute_rate: PER_MINUTE_RATE,
        }
    }
}

impl FareSchedule {
    pub fn new(per_minute_rate: f64) -> Self {
        Self { per_minute_rate }
    }

    /// Quote a trip of `trip_seconds` total duration.
    ///
    /// Formula: `price = round_to_cents(trip_seconds / 60 * per_minute_rate)`
    pub fn quote(&self, trip_seconds: f64) -> f64 {
        round_to_cents(trip_seconds / 60.0 * self.per_minute_rate)
    }
}

/// Round half away from zero to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_matches_linear_formula() {
        let fares = FareSchedule::default();
        // 300s pickup + 600s drop-off = 15 minutes
        assert_eq!(fares.quote(900.0), 7.5);
    }

    #[test]
    fn quote_rounds_to_cents() {
        let fares = FareSchedule::default();
        // 100s = 1.666..667 minutes -> 0.8333... -> 0.83
        assert_eq!(fares.quote(100.0), 0.83);
        // 101s -> 0.841666... -> 0.84
        assert_eq!(fares.quote(101.0), 0.84);
    }

    #[test]
    fn zero_duration_is_free() {
        assert_eq!(FareSchedule::default().quote(0.0), 0.0);
    }

    #[test]
    fn custom_rate_scales_linearly() {
        let fares = FareSchedule::new(1.0);
        assert_eq!(fares.quote(900.0), 15.0);
    }
}
