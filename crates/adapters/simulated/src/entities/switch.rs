//! Motor mode switches.

use std::sync::Mutex;

use reachy_mini_app::ports::Toggleable;
use reachy_mini_domain::entity::EntityDescriptor;
use reachy_mini_domain::error::ReachyError;

use super::Link;

/// On/off flag behind a switch entity. Commands fail while the robot is
/// unreachable and leave the flag untouched.
struct SwitchCore {
    descriptor: EntityDescriptor,
    link: Link,
    on: Mutex<bool>,
}

impl SwitchCore {
    fn new(descriptor: EntityDescriptor, link: Link) -> Self {
        Self {
            descriptor,
            link,
            on: Mutex::new(false),
        }
    }

    fn is_on(&self) -> bool {
        self.on.lock().map_or_else(|poisoned| *poisoned.into_inner(), |g| *g)
    }

    fn set(&self, on: bool) -> Result<(), ReachyError> {
        self.link.ensure_reachable()?;
        *self
            .on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = on;
        Ok(())
    }
}

/// Compliance mode: motors go limp so the head can be moved by hand.
pub struct ComplianceSwitch(SwitchCore);

impl ComplianceSwitch {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link) -> Self {
        Self(SwitchCore::new(descriptor, link))
    }
}

impl Toggleable for ComplianceSwitch {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.0.descriptor
    }

    fn is_on(&self) -> bool {
        self.0.is_on()
    }

    async fn turn_on(&self) -> Result<(), ReachyError> {
        tracing::info!(device_key = %self.0.link.device_key(), "enabling compliance mode");
        self.0.set(true)
    }

    async fn turn_off(&self) -> Result<(), ReachyError> {
        tracing::info!(device_key = %self.0.link.device_key(), "disabling compliance mode");
        self.0.set(false)
    }
}

/// Motor torque.
pub struct TorqueSwitch(SwitchCore);

impl TorqueSwitch {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, link: Link) -> Self {
        Self(SwitchCore::new(descriptor, link))
    }
}

impl Toggleable for TorqueSwitch {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.0.descriptor
    }

    fn is_on(&self) -> bool {
        self.0.is_on()
    }

    async fn turn_on(&self) -> Result<(), ReachyError> {
        tracing::info!(device_key = %self.0.link.device_key(), "enabling torque");
        self.0.set(true)
    }

    async fn turn_off(&self) -> Result<(), ReachyError> {
        tracing::info!(device_key = %self.0.link.device_key(), "disabling torque");
        self.0.set(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachy_mini_domain::endpoint::derive_device_key;
    use reachy_mini_domain::entity::EntityKind;
    use reachy_mini_domain::id::EntryId;
    use reachy_mini_domain::service::Service;

    fn link() -> Link {
        Link::new(derive_device_key("10.0.0.5", 8000), true)
    }

    fn descriptor(link: &Link, kind: EntityKind) -> EntityDescriptor {
        EntityDescriptor::new(EntryId::new(), link.device_key().clone(), kind)
    }

    #[test]
    fn should_default_to_off() {
        let link = link();
        let switch = TorqueSwitch::new(descriptor(&link, EntityKind::Torque), link);
        assert!(!switch.is_on());
    }

    #[tokio::test]
    async fn should_turn_on_and_off() {
        let link = link();
        let switch = ComplianceSwitch::new(descriptor(&link, EntityKind::Compliance), link);

        switch.turn_on().await.unwrap();
        assert!(switch.is_on());
        switch.turn_off().await.unwrap();
        assert!(!switch.is_on());
    }

    #[tokio::test]
    async fn should_toggle_through_service() {
        let link = link();
        let switch = TorqueSwitch::new(descriptor(&link, EntityKind::Torque), link);

        switch.call(Service::Toggle).await.unwrap();
        assert!(switch.is_on());
    }

    #[tokio::test]
    async fn should_keep_state_when_unreachable() {
        let link = link();
        let switch = TorqueSwitch::new(descriptor(&link, EntityKind::Torque), link.clone());
        link.set_reachable(false);

        let err = switch.turn_on().await.unwrap_err();
        assert!(matches!(err, ReachyError::Device(_)));
        assert!(!switch.is_on());
    }
}
