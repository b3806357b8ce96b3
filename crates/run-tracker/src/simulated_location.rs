//! Simulated location and GPS status feeds for the console host.
//!
//! The walker keeps its position across subscriptions, so a resumed run
//! continues from where the previous lap stopped.

use crate::config::SimulationConfig;

use run_tracker_core::{
    Coordinate, GpsStatusSource, LocationFix, LocationSource, geo::destination_point,
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::Utc;
use futures::{StreamExt, stream::BoxStream};
use tokio::time::MissedTickBehavior;
use tracing::trace;

/// Degrees the heading turns after every fix.
const HEADING_STEP_DEGREES: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
struct Walker {
    position: Coordinate,
    heading_degrees: f64,
}

impl Walker {
    /// Returns the current position, then takes one step.
    fn advance(&mut self, step_meters: f64) -> Coordinate {
        let current = self.position;
        self.position = destination_point(current, self.heading_degrees, step_meters);
        self.heading_degrees = (self.heading_degrees + HEADING_STEP_DEGREES) % 360.0;
        current
    }
}

/// Emits a fix every `fix_interval`, walking `step_meters` per fix.
pub struct SimulatedLocationSource {
    walker: Arc<Mutex<Walker>>,
    fix_interval: Duration,
    step_meters: f64,
}

impl SimulatedLocationSource {
    /// Starts a walk at `start`, heading north.
    pub fn new(start: Coordinate, fix_interval: Duration, step_meters: f64) -> Self {
        Self {
            walker: Arc::new(Mutex::new(Walker {
                position: start,
                heading_degrees: 0.0,
            })),
            fix_interval,
            step_meters,
        }
    }

    /// Builds a walker from the `[simulation]` config section.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.start(), config.fix_interval(), config.step_meters)
    }
}

impl LocationSource for SimulatedLocationSource {
    fn stream(&self) -> BoxStream<'static, LocationFix> {
        let mut ticker = tokio::time::interval(self.fix_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let walker = Arc::clone(&self.walker);
        let step_meters = self.step_meters;

        futures::stream::unfold(ticker, move |mut ticker| {
            let walker = Arc::clone(&walker);
            async move {
                ticker.tick().await;

                let position = walker
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .advance(step_meters);
                trace!(lat = position.latitude, lng = position.longitude, "Simulated fix");

                let fix = LocationFix {
                    latitude: position.latitude,
                    longitude: position.longitude,
                    timestamp_millis: Utc::now().timestamp_millis(),
                };
                Some((fix, ticker))
            }
        })
        .boxed()
    }
}

/// Reports a fixed GPS status once, then never again.
pub struct StaticGpsStatus {
    enabled: bool,
}

impl StaticGpsStatus {
    /// Creates a source that reports `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl GpsStatusSource for StaticGpsStatus {
    fn stream(&self) -> BoxStream<'static, bool> {
        futures::stream::once(futures::future::ready(self.enabled))
            .chain(futures::stream::pending())
            .boxed()
    }
}
