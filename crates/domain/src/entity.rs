//! Entity: a single observable or controllable aspect of a robot.
//!
//! Every config entry owns exactly one descriptor per [`EntityKind`]; the
//! descriptor's unique id is `"{entry_id}_{suffix}"`.

mod kind;
mod reading;
mod state;

pub use kind::{EntityKind, Platform};
pub use reading::{BatteryLevel, ConnectionStatus, Reading};
pub use state::EntityState;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::endpoint::DeviceKey;
use crate::error::ValidationError;
use crate::id::EntryId;
use crate::time::Timestamp;

/// Derive an entity's unique id from its owning entry and its suffix.
#[must_use]
pub fn derive_entity_id(entry_id: impl Display, suffix: &str) -> String {
    format!("{entry_id}_{suffix}")
}

/// Split a unique id back into its entry and kind.
///
/// Entry ids never contain `_`, so the first underscore is the separator.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedUniqueId`] when there is no separator
/// or the entry part is not a valid id, or
/// [`ValidationError::UnknownEntitySuffix`] for an unrecognised suffix.
pub fn parse_unique_id(unique_id: &str) -> Result<(EntryId, EntityKind), ValidationError> {
    let malformed = || ValidationError::MalformedUniqueId(unique_id.to_string());
    let (entry, suffix) = unique_id.split_once('_').ok_or_else(malformed)?;
    let entry_id = entry.parse::<EntryId>().map_err(|_| malformed())?;
    let kind = suffix.parse::<EntityKind>()?;
    Ok((entry_id, kind))
}

/// Immutable identity of one entity, created at setup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub entry_id: EntryId,
    pub device_key: DeviceKey,
    pub kind: EntityKind,
}

impl EntityDescriptor {
    #[must_use]
    pub fn new(entry_id: EntryId, device_key: DeviceKey, kind: EntityKind) -> Self {
        Self {
            entry_id,
            device_key,
            kind,
        }
    }

    /// The full descriptor set for one entry, one per kind.
    #[must_use]
    pub fn all_for(entry_id: EntryId, device_key: &DeviceKey) -> Vec<Self> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| Self::new(entry_id, device_key.clone(), kind))
            .collect()
    }

    #[must_use]
    pub fn unique_id(&self) -> String {
        derive_entity_id(self.entry_id, self.kind.suffix())
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.kind.platform()
    }
}

/// Optional behaviour an entity advertises to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFeature {
    Stream,
}

/// Point-in-time view of an entity, as rendered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub unique_id: String,
    pub name: String,
    pub platform: Platform,
    pub descriptor: EntityDescriptor,
    pub state: EntityState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_features: Vec<EntityFeature>,
    pub last_updated: Timestamp,
}

impl EntitySnapshot {
    #[must_use]
    pub fn new(descriptor: EntityDescriptor, state: EntityState, last_updated: Timestamp) -> Self {
        let kind = descriptor.kind;
        Self {
            unique_id: descriptor.unique_id(),
            name: kind.friendly_name().to_string(),
            platform: kind.platform(),
            descriptor,
            state,
            device_class: kind.device_class().map(str::to_string),
            state_class: kind.state_class().map(str::to_string),
            unit_of_measurement: kind.unit_of_measurement().map(str::to_string),
            options: kind
                .options()
                .map(|options| options.iter().map(|o| (*o).to_string()).collect()),
            icon: kind.icon().map(str::to_string),
            supported_features: Vec::new(),
            last_updated,
        }
    }

    #[must_use]
    pub fn with_feature(mut self, feature: EntityFeature) -> Self {
        if !self.supported_features.contains(&feature) {
            self.supported_features.push(feature);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::endpoint::derive_device_key;
    use crate::time::now;

    #[test]
    fn should_join_entry_id_and_suffix_with_underscore() {
        assert_eq!(derive_entity_id("abc123", "battery"), "abc123_battery");
        assert_eq!(
            derive_entity_id("abc123", "teleop_camera"),
            "abc123_teleop_camera"
        );
    }

    #[test]
    fn should_produce_unique_ids_within_one_entry() {
        let entry_id = EntryId::new();
        let key = derive_device_key("10.0.0.5", 8000);
        let ids: HashSet<String> = EntityDescriptor::all_for(entry_id, &key)
            .iter()
            .map(EntityDescriptor::unique_id)
            .collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn should_not_collide_across_entries() {
        let key = derive_device_key("10.0.0.5", 8000);
        let a = EntityDescriptor::new(EntryId::new(), key.clone(), EntityKind::Torque);
        let b = EntityDescriptor::new(EntryId::new(), key, EntityKind::Torque);
        assert_ne!(a.unique_id(), b.unique_id());
    }

    #[test]
    fn should_parse_unique_id_back_to_entry_and_kind() {
        let entry_id = EntryId::new();
        let unique_id = derive_entity_id(entry_id, "teleop_camera");
        assert_eq!(
            parse_unique_id(&unique_id),
            Ok((entry_id, EntityKind::TeleopCamera))
        );
    }

    #[test]
    fn should_reject_unique_id_without_separator() {
        assert!(matches!(
            parse_unique_id("nounderscore"),
            Err(ValidationError::MalformedUniqueId(_))
        ));
    }

    #[test]
    fn should_reject_unique_id_with_unknown_suffix() {
        let unique_id = derive_entity_id(EntryId::new(), "gripper");
        assert!(matches!(
            parse_unique_id(&unique_id),
            Err(ValidationError::UnknownEntitySuffix(_))
        ));
    }

    #[test]
    fn should_fill_snapshot_metadata_from_kind() {
        let descriptor = EntityDescriptor::new(
            EntryId::new(),
            derive_device_key("10.0.0.5", 8000),
            EntityKind::Battery,
        );
        let snapshot = EntitySnapshot::new(descriptor.clone(), EntityState::Unknown, now());
        assert_eq!(snapshot.unique_id, descriptor.unique_id());
        assert_eq!(snapshot.name, "Battery Level");
        assert_eq!(snapshot.platform, Platform::Sensor);
        assert_eq!(snapshot.unit_of_measurement.as_deref(), Some("%"));
        assert_eq!(snapshot.device_class.as_deref(), Some("battery"));
        assert_eq!(snapshot.state_class.as_deref(), Some("measurement"));
        assert!(snapshot.icon.is_none());
        assert!(snapshot.options.is_none());
        assert!(snapshot.supported_features.is_empty());
    }

    #[test]
    fn should_omit_absent_metadata_when_serializing() {
        let descriptor = EntityDescriptor::new(
            EntryId::new(),
            derive_device_key("10.0.0.5", 8000),
            EntityKind::Connection,
        );
        let json = serde_json::to_value(EntitySnapshot::new(descriptor, EntityState::Unknown, now()))
            .unwrap();
        assert_eq!(json["device_class"], "enum");
        assert_eq!(json["options"], serde_json::json!(["connected", "disconnected"]));
        assert!(json.get("state_class").is_none());
        assert!(json.get("supported_features").is_none());
    }

    #[test]
    fn should_add_feature_once() {
        let descriptor = EntityDescriptor::new(
            EntryId::new(),
            derive_device_key("10.0.0.5", 8000),
            EntityKind::TeleopCamera,
        );
        let snapshot = EntitySnapshot::new(descriptor, EntityState::Idle, now())
            .with_feature(EntityFeature::Stream)
            .with_feature(EntityFeature::Stream);
        assert_eq!(snapshot.supported_features, vec![EntityFeature::Stream]);
    }
}
