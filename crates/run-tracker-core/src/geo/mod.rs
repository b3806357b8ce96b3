mod coordinate;
mod stats;
mod stopwatch;

pub use {
    coordinate::{Coordinate, Path, Segment},
    stats::{
        CaloriePolicy, DEFAULT_CALORIES_PER_KM, EARTH_RADIUS_METERS, FlatRateCalories, RunStats,
        average_speed_kmh, calories_burned, destination_point, haversine_meters, path_length,
        segment_length,
    },
    stopwatch::format_stopwatch,
};
