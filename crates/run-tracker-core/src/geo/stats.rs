//! Distance, speed and calorie math over a recorded path.
//!
//! Everything here is a pure function of its inputs. Any NaN or infinity
//! produced along the way is clamped to zero before it is returned.

use crate::geo::{Coordinate, Path, Segment};

/// Mean earth radius (IUGG) in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Calories credited per kilometre by the default policy.
pub const DEFAULT_CALORIES_PER_KM: f64 = 60.0;

/// Great-circle distance between two coordinates using the haversine formula.
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    finite_or_zero(EARTH_RADIUS_METERS * c)
}

/// Point reached by travelling `meters` from `from` on the initial
/// `bearing_degrees` (clockwise from north) along a great circle.
pub fn destination_point(from: Coordinate, bearing_degrees: f64, meters: f64) -> Coordinate {
    let delta = meters / EARTH_RADIUS_METERS;
    let bearing = bearing_degrees.to_radians();
    let lat1 = from.latitude.to_radians();
    let lng1 = from.longitude.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    // Normalise longitude back into [-180, 180).
    let longitude = (lng2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate::new(lat2.to_degrees(), longitude)
}

/// Length of a single segment in metres.
pub fn segment_length(segment: &Segment) -> f64 {
    segment
        .windows(2)
        .map(|pair| haversine_meters(pair[0], pair[1]))
        .sum()
}

/// Total length of a path in metres.
///
/// Segments are measured independently; the gap between the end of one
/// segment and the start of the next is never counted.
pub fn path_length(path: &Path) -> f64 {
    finite_or_zero(path.iter().map(segment_length).sum())
}

/// Average speed in km/h, or `0.0` when either input is non-positive.
pub fn average_speed_kmh(distance_meters: f64, elapsed_millis: i64) -> f64 {
    if elapsed_millis <= 0 || distance_meters.is_nan() || distance_meters <= 0.0 {
        return 0.0;
    }

    let hours = elapsed_millis as f64 / 1000.0 / 3600.0;
    finite_or_zero((distance_meters / 1000.0) / hours)
}

/// Calorie estimate using the default flat rate of 60 kcal/km.
pub fn calories_burned(distance_meters: f64) -> i64 {
    FlatRateCalories::default().calories(distance_meters)
}

/// Strategy for turning a distance into a calorie estimate.
pub trait CaloriePolicy: Send + Sync {
    /// Calories burned for `distance_meters`.
    fn calories(&self, distance_meters: f64) -> i64;
}

/// Placeholder policy: a fixed number of calories per kilometre.
///
/// The default rate has no physiological basis. It is kept as-is until a
/// better model is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatRateCalories {
    /// Calories credited per kilometre.
    pub calories_per_km: f64,
}

impl FlatRateCalories {
    /// Creates a policy with a custom per-kilometre rate.
    pub fn new(calories_per_km: f64) -> Self {
        Self { calories_per_km }
    }
}

impl Default for FlatRateCalories {
    fn default() -> Self {
        Self::new(DEFAULT_CALORIES_PER_KM)
    }
}

impl CaloriePolicy for FlatRateCalories {
    fn calories(&self, distance_meters: f64) -> i64 {
        let calories = finite_or_zero((distance_meters / 1000.0) * self.calories_per_km);
        calories.round().max(0.0) as i64
    }
}

/// Derived statistics for a run at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStats {
    /// Total recorded distance in metres.
    pub distance_meters: f64,
    /// Average speed over the elapsed time in km/h.
    pub avg_speed_kmh: f64,
    /// Estimated calories burned.
    pub calories_burned: i64,
}

impl RunStats {
    /// Computes all statistics for `path` over `elapsed_millis`.
    pub fn compute(path: &Path, elapsed_millis: i64, policy: &dyn CaloriePolicy) -> Self {
        let distance_meters = path_length(path);

        Self {
            distance_meters,
            avg_speed_kmh: average_speed_kmh(distance_meters, elapsed_millis),
            calories_burned: policy.calories(distance_meters),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
