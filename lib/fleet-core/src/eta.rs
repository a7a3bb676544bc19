//! Arrival-time estimation

use chrono::TimeDelta;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Hours needed to cover `distance_km` at `velocity` km/h.
///
/// `velocity` must be non-zero; the registry rejects zero velocities before a
/// vessel can reach this point, so it is not checked here. A negative velocity
/// yields a negative estimate.
#[inline]
pub fn estimate_hours(distance_km: f64, velocity: f64) -> f64 {
    distance_km / velocity
}

/// Arrival estimate as a signed duration with microsecond precision.
///
/// Same precondition as [`estimate_hours`].
pub fn estimate_arrival(distance_km: f64, velocity: f64) -> TimeDelta {
    hours_to_delta(estimate_hours(distance_km, velocity))
}

/// Convert fractional hours into a duration.
///
/// Infinite values saturate to the representable range and NaN maps to zero.
fn hours_to_delta(hours: f64) -> TimeDelta {
    TimeDelta::microseconds((hours * MICROS_PER_HOUR).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_hours() {
        assert_eq!(estimate_hours(100.0, 20.0), 5.0);
        assert_eq!(estimate_hours(0.0, 20.0), 0.0);
    }

    #[test]
    fn test_estimate_arrival_duration() {
        let eta = estimate_arrival(30.0, 20.0);
        assert_eq!(eta, TimeDelta::minutes(90));
    }

    #[test]
    fn test_negative_velocity_gives_negative_duration() {
        let eta = estimate_arrival(10.0, -10.0);
        assert_eq!(eta, TimeDelta::hours(-1));
    }

    #[test]
    fn test_zero_velocity_saturates() {
        assert!(estimate_hours(10.0, 0.0).is_infinite());
        assert!(estimate_arrival(10.0, 0.0) > TimeDelta::days(365 * 1000));
        assert_eq!(hours_to_delta(f64::NAN), TimeDelta::zero());
    }
}
