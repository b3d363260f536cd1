//! Teleoperation camera.

use std::sync::atomic::{AtomicBool, Ordering};

use reachy_mini_app::ports::Streamable;
use reachy_mini_domain::entity::EntityDescriptor;
use reachy_mini_domain::error::ReachyError;

use super::Link;

/// Camera feed used for teleoperation.
///
/// The simulated robot publishes no frames and no stream URL; only the
/// streaming flag is tracked.
pub struct TeleopCamera {
    descriptor: EntityDescriptor,
    link: Link,
    streaming: AtomicBool,
}

impl TeleopCamera {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link) -> Self {
        Self {
            descriptor,
            link,
            streaming: AtomicBool::new(false),
        }
    }

    /// Force the camera back to idle, e.g. after a failed command.
    pub fn reset(&self) {
        self.streaming.store(false, Ordering::SeqCst);
    }
}

impl Streamable for TeleopCamera {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    async fn start_stream(&self) -> Result<(), ReachyError> {
        self.link.ensure_reachable()?;
        tracing::info!(device_key = %self.link.device_key(), "starting camera stream");
        self.streaming.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_stream(&self) -> Result<(), ReachyError> {
        tracing::info!(device_key = %self.link.device_key(), "stopping camera stream");
        self.streaming.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn still_image(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, ReachyError> {
        tracing::debug!(
            device_key = %self.link.device_key(),
            ?width,
            ?height,
            "camera image requested"
        );
        self.link.ensure_reachable()?;
        Ok(None)
    }

    async fn stream_source(&self) -> Result<Option<String>, ReachyError> {
        Ok(None)
    }
}
