use futures::stream::BoxStream;

/// Source of the device's location-hardware on/off signal.
pub trait GpsStatusSource: Send + Sync {
    /// Emits the current state, then every change.
    fn stream(&self) -> BoxStream<'static, bool>;
}
