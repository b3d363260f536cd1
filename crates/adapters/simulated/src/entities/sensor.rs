//! Read-only robot sensors.

use reachy_mini_app::ports::Readable;
use reachy_mini_domain::entity::{
    BatteryLevel, ConnectionStatus, EntityDescriptor, EntityState, Reading,
};
use reachy_mini_domain::error::ReachyError;

use super::Link;
use crate::error::SimulatedError;

/// Reports whether the robot answers.
pub struct ConnectionSensor {
    descriptor: EntityDescriptor,
    link: Link,
}

impl ConnectionSensor {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link) -> Self {
        Self { descriptor, link }
    }
}

impl Readable for ConnectionSensor {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    async fn read(&self) -> Result<Reading, ReachyError> {
        self.link.ensure_reachable()?;
        Ok(Reading::Connection(ConnectionStatus::Connected))
    }

    fn fallback_state(&self) -> EntityState {
        EntityState::Reading(Reading::Connection(ConnectionStatus::Disconnected))
    }
}

/// Battery charge in percent.
pub struct BatterySensor {
    descriptor: EntityDescriptor,
    link: Link,
    percent: u8,
}

impl BatterySensor {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link, percent: u8) -> Self {
        Self {
            descriptor,
            link,
            percent,
        }
    }
}

impl Readable for BatterySensor {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    async fn read(&self) -> Result<Reading, ReachyError> {
        self.link.ensure_reachable()?;
        let level = BatteryLevel::new(self.percent).map_err(SimulatedError::InvalidValue)?;
        Ok(Reading::Battery(level))
    }
}

/// Body temperature in degrees Celsius.
pub struct TemperatureSensor {
    descriptor: EntityDescriptor,
    link: Link,
    celsius: f64,
}

impl TemperatureSensor {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link, celsius: f64) -> Self {
        Self {
            descriptor,
            link,
            celsius,
        }
    }
}

impl Readable for TemperatureSensor {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    async fn read(&self) -> Result<Reading, ReachyError> {
        self.link.ensure_reachable()?;
        Ok(Reading::Temperature(self.celsius))
    }
}
