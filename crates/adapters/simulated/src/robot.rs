//! One simulated robot: the six entities of a config entry.

use reachy_mini_app::ports::capability::{camera_snapshot, read_snapshot, switch_snapshot};
use reachy_mini_app::ports::{Readable, Streamable, Toggleable};
use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::entity::{EntityDescriptor, EntityKind, EntitySnapshot};
use reachy_mini_domain::error::{ReachyError, ValidationError};
use reachy_mini_domain::service::Service;

use crate::config::SimulatedConfig;
use crate::entities::{
    BatterySensor, ComplianceSwitch, ConnectionSensor, Link, TeleopCamera, TemperatureSensor,
    TorqueSwitch,
};

pub struct SimulatedRobot {
    link: Link,
    connection: ConnectionSensor,
    battery: BatterySensor,
    temperature: TemperatureSensor,
    compliance: ComplianceSwitch,
    torque: TorqueSwitch,
    camera: TeleopCamera,
}

impl SimulatedRobot {
    #[must_use]
    pub fn new(entry: &ConfigEntry, config: &SimulatedConfig) -> Self {
        let key = entry.device_key();
        let link = Link::new(key.clone(), config.reachable);
        let descriptor = |kind| EntityDescriptor::new(entry.entry_id, key.clone(), kind);

        Self {
            connection: ConnectionSensor::new(descriptor(EntityKind::Connection), link.clone()),
            battery: BatterySensor::new(
                descriptor(EntityKind::Battery),
                link.clone(),
                config.battery_level,
            ),
            temperature: TemperatureSensor::new(
                descriptor(EntityKind::Temperature),
                link.clone(),
                config.temperature_celsius,
            ),
            compliance: ComplianceSwitch::new(descriptor(EntityKind::Compliance), link.clone()),
            torque: TorqueSwitch::new(descriptor(EntityKind::Torque), link.clone()),
            camera: TeleopCamera::new(descriptor(EntityKind::TeleopCamera), link.clone()),
            link,
        }
    }

    #[must_use]
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// Descriptors in [`EntityKind::ALL`] order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<EntityDescriptor> {
        EntityKind::ALL
            .iter()
            .map(|kind| self.descriptor(*kind).clone())
            .collect()
    }

    fn descriptor(&self, kind: EntityKind) -> &EntityDescriptor {
        match kind {
            EntityKind::Connection => self.connection.descriptor(),
            EntityKind::Battery => self.battery.descriptor(),
            EntityKind::Temperature => self.temperature.descriptor(),
            EntityKind::Compliance => self.compliance.descriptor(),
            EntityKind::Torque => self.torque.descriptor(),
            EntityKind::TeleopCamera => self.camera.descriptor(),
        }
    }

    pub async fn snapshot(&self, kind: EntityKind) -> EntitySnapshot {
        match kind {
            EntityKind::Connection => read_snapshot(&self.connection).await,
            EntityKind::Battery => read_snapshot(&self.battery).await,
            EntityKind::Temperature => read_snapshot(&self.temperature).await,
            EntityKind::Compliance => switch_snapshot(&self.compliance),
            EntityKind::Torque => switch_snapshot(&self.torque),
            EntityKind::TeleopCamera => camera_snapshot(&self.camera),
        }
    }

    pub async fn refresh(&self) -> Vec<EntitySnapshot> {
        let mut snapshots = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            snapshots.push(self.snapshot(kind).await);
        }
        snapshots
    }

    /// Apply `service` to the entity of `kind`.
    ///
    /// Command failures are logged and the entity keeps reporting its
    /// current state; a failed camera command leaves the camera idle.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ServiceNotSupported`] for sensors.
    pub async fn call(
        &self,
        kind: EntityKind,
        service: Service,
    ) -> Result<EntitySnapshot, ReachyError> {
        let result = match kind {
            EntityKind::Compliance => self.compliance.call(service).await,
            EntityKind::Torque => self.torque.call(service).await,
            EntityKind::TeleopCamera => {
                let result = self.camera.call(service).await;
                if result.is_err() {
                    self.camera.reset();
                }
                result
            }
            EntityKind::Connection | EntityKind::Battery | EntityKind::Temperature => {
                return Err(ValidationError::ServiceNotSupported {
                    unique_id: self.descriptor(kind).unique_id(),
                    service: service.to_string(),
                }
                .into());
            }
        };

        if let Err(err) = result {
            tracing::error!(
                device_key = %self.link.device_key(),
                entity = %kind,
                %service,
                error = %err,
                "service call failed"
            );
        }

        Ok(self.snapshot(kind).await)
    }

    /// # Errors
    ///
    /// Returns a device error when the robot is unreachable.
    pub async fn camera_image(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, ReachyError> {
        self.camera.still_image(width, height).await
    }

    /// # Errors
    ///
    /// Never fails for the simulated camera.
    pub async fn stream_source(&self) -> Result<Option<String>, ReachyError> {
        self.camera.stream_source().await
    }
}
