//! Simulated entities of one robot.
//!
//! Every entity holds a clone of the robot's [`Link`]; when the link is
//! unreachable, reads and commands fail the way a real client would.

mod camera;
mod sensor;
mod switch;

pub use camera::TeleopCamera;
pub use sensor::{BatterySensor, ConnectionSensor, TemperatureSensor};
pub use switch::{ComplianceSwitch, TorqueSwitch};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reachy_mini_domain::endpoint::DeviceKey;

use crate::error::SimulatedError;

/// Shared connection state of one simulated robot.
#[derive(Debug, Clone)]
pub struct Link {
    device_key: DeviceKey,
    reachable: Arc<AtomicBool>,
}

impl Link {
    #[must_use]
    pub fn new(device_key: DeviceKey, reachable: bool) -> Self {
        Self {
            device_key,
            reachable: Arc::new(AtomicBool::new(reachable)),
        }
    }

    #[must_use]
    pub fn device_key(&self) -> &DeviceKey {
        &self.device_key
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    /// Simulate the robot going offline or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// # Errors
    ///
    /// Returns [`SimulatedError::Unreachable`] when the robot is offline.
    pub fn ensure_reachable(&self) -> Result<(), SimulatedError> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(SimulatedError::Unreachable(self.device_key.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_share_reachability_between_clones() {
        let link = Link::new(DeviceKey::from("10.0.0.5:8000"), true);
        let clone = link.clone();

        clone.set_reachable(false);

        assert!(!link.is_reachable());
        assert!(matches!(
            link.ensure_reachable(),
            Err(SimulatedError::Unreachable(_))
        ));
    }
}
