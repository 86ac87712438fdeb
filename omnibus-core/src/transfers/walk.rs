//! Walking time estimation between stops.

use chrono::Duration;
use geo::{HaversineDistance, Point};

use crate::Error;

/// Turns a distance, or a pair of coordinates, into a walking duration.
pub trait WalkingTimeCalculator: Send + Sync {
    /// Walking time between two coordinates, in decimal degrees.
    fn walking_time_between(
        &self,
        latitude_1: f64,
        longitude_1: f64,
        latitude_2: f64,
        longitude_2: f64,
    ) -> Duration;

    /// Walking time for a distance in kilometres.
    fn walking_time(&self, distance_km: f64) -> Duration;
}

/// Assumes a constant walking speed along the great-circle line between the
/// points, with an optional scaling factor to account for detours.
pub struct LinearWalkingTimeCalculator {
    walking_speed_kmh: f64,
    scaling_factor: f64,
}

impl LinearWalkingTimeCalculator {
    pub fn new(walking_speed_kmh: f64) -> Result<Self, Error> {
        Self::with_scaling(walking_speed_kmh, 1.0)
    }

    pub fn with_scaling(walking_speed_kmh: f64, scaling_factor: f64) -> Result<Self, Error> {
        if walking_speed_kmh <= 0.0 {
            return Err(Error::InvalidParameter("walking speed must be positive"));
        }
        if scaling_factor <= 0.0 {
            return Err(Error::InvalidParameter("scaling factor must be positive"));
        }
        Ok(Self {
            walking_speed_kmh,
            scaling_factor,
        })
    }
}

impl WalkingTimeCalculator for LinearWalkingTimeCalculator {
    fn walking_time_between(
        &self,
        latitude_1: f64,
        longitude_1: f64,
        latitude_2: f64,
        longitude_2: f64,
    ) -> Duration {
        self.walking_time(haversine_distance_km(
            latitude_1,
            longitude_1,
            latitude_2,
            longitude_2,
        ))
    }

    fn walking_time(&self, distance_km: f64) -> Duration {
        let seconds = self.scaling_factor * 3600.0 * distance_km / self.walking_speed_kmh;
        Duration::seconds(seconds.ceil() as i64)
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_distance_km(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let from = Point::new(longitude_1, latitude_1);
    let to = Point::new(longitude_2, latitude_2);
    from.haversine_distance(&to) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_1: (f64, f64) = (59.15783963140067, 18.383180457016003);
    // The distance between point 1 and point 2 is 5 kilometres.
    const POINT_2: (f64, f64) = (59.136848379900925, 18.305591982240376);

    #[test]
    fn default_scaling_is_one() {
        let calculator = LinearWalkingTimeCalculator::new(5.0).unwrap();
        // 5 kilometres at 5 km/h take 1 hour.
        assert_eq!(calculator.walking_time(5.0).num_seconds(), 3600);
        // Coordinates carry some inaccuracy.
        let seconds = calculator
            .walking_time_between(POINT_1.0, POINT_1.1, POINT_2.0, POINT_2.1)
            .num_seconds();
        assert!((seconds - 3600).abs() <= 10, "got {seconds}");
        assert_eq!(calculator.walking_time(10.0).num_seconds(), 2 * 3600);
    }

    #[test]
    fn scaling_is_applied() {
        let calculator = LinearWalkingTimeCalculator::with_scaling(5.0, 1.5).unwrap();
        assert_eq!(calculator.walking_time(5.0).num_seconds(), 5400);
        assert_eq!(calculator.walking_time(10.0).num_seconds(), 3 * 3600);
    }

    #[test]
    fn partial_seconds_round_up() {
        let calculator = LinearWalkingTimeCalculator::new(5.0).unwrap();
        // 100 m at 5 km/h is exactly 72 s; 101 m rounds up to 73 s.
        assert_eq!(calculator.walking_time(0.1).num_seconds(), 72);
        assert_eq!(calculator.walking_time(0.101).num_seconds(), 73);
    }

    #[test]
    fn speed_must_be_positive() {
        assert!(matches!(
            LinearWalkingTimeCalculator::new(0.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            LinearWalkingTimeCalculator::new(-5.0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn scaling_factor_must_be_positive() {
        assert!(matches!(
            LinearWalkingTimeCalculator::with_scaling(5.0, 0.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            LinearWalkingTimeCalculator::with_scaling(5.0, -1.0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
