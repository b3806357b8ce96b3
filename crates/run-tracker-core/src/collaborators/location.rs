use crate::geo::Coordinate;

use futures::stream::BoxStream;

/// A single position report from the location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Provider timestamp, milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
}

impl LocationFix {
    /// The fix as a path coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Source of location fixes.
///
/// Each call to [`stream`](LocationSource::stream) starts a fresh
/// subscription; dropping the stream cancels it. Streams may go quiet while
/// the provider is unavailable and may end if permission is revoked.
pub trait LocationSource: Send + Sync {
    /// Subscribes to location updates.
    fn stream(&self) -> BoxStream<'static, LocationFix>;
}
