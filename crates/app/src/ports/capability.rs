//! Entity capabilities.
//!
//! Each entity kind implements the one capability it needs. Concrete entity
//! structs live in integration adapters and share no base type; the helpers
//! at the bottom turn any capability into an [`EntitySnapshot`].

use std::future::Future;

use reachy_mini_domain::entity::{
    EntityDescriptor, EntityFeature, EntitySnapshot, EntityState, Reading,
};
use reachy_mini_domain::error::ReachyError;
use reachy_mini_domain::service::Service;
use reachy_mini_domain::time::now;

/// A sensor: produces a [`Reading`] on refresh.
pub trait Readable: Send + Sync {
    fn descriptor(&self) -> &EntityDescriptor;

    /// Fetch a fresh value from the device.
    fn read(&self) -> impl Future<Output = Result<Reading, ReachyError>> + Send;

    /// State reported when [`read`](Self::read) fails.
    fn fallback_state(&self) -> EntityState {
        EntityState::Unknown
    }
}

/// A switch: an on/off flag the host can flip.
pub trait Toggleable: Send + Sync {
    fn descriptor(&self) -> &EntityDescriptor;

    fn is_on(&self) -> bool;

    fn turn_on(&self) -> impl Future<Output = Result<(), ReachyError>> + Send;

    fn turn_off(&self) -> impl Future<Output = Result<(), ReachyError>> + Send;

    /// Dispatch a [`Service`] to `turn_on` / `turn_off`.
    fn call(&self, service: Service) -> impl Future<Output = Result<(), ReachyError>> + Send {
        async move {
            if service.apply(self.is_on()) {
                self.turn_on().await
            } else {
                self.turn_off().await
            }
        }
    }
}

/// A camera feed.
pub trait Streamable: Send + Sync {
    fn descriptor(&self) -> &EntityDescriptor;

    fn is_streaming(&self) -> bool;

    /// Whether the camera can provide a live stream.
    fn supports_stream(&self) -> bool {
        true
    }

    fn start_stream(&self) -> impl Future<Output = Result<(), ReachyError>> + Send;

    fn stop_stream(&self) -> impl Future<Output = Result<(), ReachyError>> + Send;

    /// A still frame, optionally scaled. `None` when no frame is available.
    fn still_image(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, ReachyError>> + Send;

    /// URL of the live stream, if the device publishes one.
    fn stream_source(&self) -> impl Future<Output = Result<Option<String>, ReachyError>> + Send;

    fn call(&self, service: Service) -> impl Future<Output = Result<(), ReachyError>> + Send {
        async move {
            if service.apply(self.is_streaming()) {
                self.start_stream().await
            } else {
                self.stop_stream().await
            }
        }
    }
}

/// Refresh a sensor. Read failures are logged and replaced by the sensor's
/// fallback state; they never propagate.
pub async fn read_snapshot(sensor: &impl Readable) -> EntitySnapshot {
    let state = match sensor.read().await {
        Ok(reading) => EntityState::Reading(reading),
        Err(err) => {
            tracing::error!(
                unique_id = %sensor.descriptor().unique_id(),
                error = %err,
                "failed to refresh sensor"
            );
            sensor.fallback_state()
        }
    };
    EntitySnapshot::new(sensor.descriptor().clone(), state, now())
}

#[must_use]
pub fn switch_snapshot(switch: &impl Toggleable) -> EntitySnapshot {
    EntitySnapshot::new(
        switch.descriptor().clone(),
        EntityState::from_switch(switch.is_on()),
        now(),
    )
}

#[must_use]
pub fn camera_snapshot(camera: &impl Streamable) -> EntitySnapshot {
    let snapshot = EntitySnapshot::new(
        camera.descriptor().clone(),
        EntityState::from_stream(camera.is_streaming()),
        now(),
    );
    if camera.supports_stream() {
        snapshot.with_feature(EntityFeature::Stream)
    } else {
        snapshot
    }
}
