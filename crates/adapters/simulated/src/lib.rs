//! # reachy-mini-adapter-simulated
//!
//! Simulated Reachy Mini integration. It stands in for a robot protocol
//! client and reports fixed placeholder values.
//!
//! ## Provided entities
//!
//! | Entity | Platform | Behaviour |
//! |--------|----------|-----------|
//! | Connection | sensor | `connected`, or `disconnected` while unreachable |
//! | Battery | sensor | [`SimulatedConfig::battery_level`] |
//! | Temperature | sensor | [`SimulatedConfig::temperature_celsius`] |
//! | Compliance mode | switch | Responds to `turn_on` / `turn_off` / `toggle` |
//! | Torque | switch | Responds to `turn_on` / `turn_off` / `toggle` |
//! | Teleop camera | camera | Tracks streaming; no frames and no stream URL |
//!
//! ## Dependency rule
//!
//! Depends on `reachy-mini-app` (port traits) and `reachy-mini-domain` only.

mod config;
mod entities;
mod error;
mod robot;

pub use config::SimulatedConfig;
pub use entities::Link;
pub use error::SimulatedError;
pub use robot::SimulatedRobot;

use std::collections::HashMap;

use reachy_mini_app::ports::Integration;
use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::entity::{EntityDescriptor, EntityKind, EntitySnapshot};
use reachy_mini_domain::error::{NotFoundError, ReachyError};
use reachy_mini_domain::id::EntryId;
use reachy_mini_domain::service::Service;

/// Integration creating one [`SimulatedRobot`] per config entry.
#[derive(Default)]
pub struct SimulatedIntegration {
    config: SimulatedConfig,
    robots: HashMap<EntryId, SimulatedRobot>,
}

impl SimulatedIntegration {
    #[must_use]
    pub fn new(config: SimulatedConfig) -> Self {
        Self {
            config,
            robots: HashMap::new(),
        }
    }

    fn loaded(&self, entry_id: EntryId) -> Result<&SimulatedRobot, ReachyError> {
        self.robots.get(&entry_id).ok_or_else(|| {
            NotFoundError {
                entity: "Robot",
                id: entry_id.to_string(),
            }
            .into()
        })
    }
}

impl Integration for SimulatedIntegration {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn setup(&mut self, entry: &ConfigEntry) -> Result<Vec<EntityDescriptor>, ReachyError> {
        let robot = SimulatedRobot::new(entry, &self.config);
        let descriptors = robot.descriptors();
        tracing::debug!(
            entry_id = %entry.entry_id,
            endpoint = %entry.endpoint,
            "simulated robot created"
        );
        self.robots.insert(entry.entry_id, robot);
        Ok(descriptors)
    }

    async fn teardown(&mut self, entry_id: EntryId) -> Result<bool, ReachyError> {
        Ok(self.robots.remove(&entry_id).is_some())
    }

    async fn refresh(&self, entry_id: EntryId) -> Result<Vec<EntitySnapshot>, ReachyError> {
        Ok(self.loaded(entry_id)?.refresh().await)
    }

    async fn handle_service_call(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
        service: Service,
    ) -> Result<EntitySnapshot, ReachyError> {
        self.loaded(entry_id)?.call(kind, service).await
    }

    async fn camera_image(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, ReachyError> {
        debug_assert_eq!(kind, EntityKind::TeleopCamera);
        self.loaded(entry_id)?.camera_image(width, height).await
    }

    async fn stream_source(
        &self,
        entry_id: EntryId,
        kind: EntityKind,
    ) -> Result<Option<String>, ReachyError> {
        debug_assert_eq!(kind, EntityKind::TeleopCamera);
        self.loaded(entry_id)?.stream_source().await
    }
}
