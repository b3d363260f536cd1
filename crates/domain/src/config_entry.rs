//! Config entry: one user-created, persisted robot configuration.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceInfo, display_name};
use crate::endpoint::{DeviceEndpoint, DeviceKey};
use crate::id::EntryId;
use crate::time::{Timestamp, now};

/// A configured Reachy Mini. Exactly one entry exists per [`DeviceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: EntryId,
    pub title: String,
    pub endpoint: DeviceEndpoint,
    pub created_at: Timestamp,
}

impl ConfigEntry {
    #[must_use]
    pub fn builder(endpoint: DeviceEndpoint) -> ConfigEntryBuilder {
        ConfigEntryBuilder {
            endpoint,
            entry_id: None,
            title: None,
            created_at: None,
        }
    }

    #[must_use]
    pub fn device_key(&self) -> DeviceKey {
        self.endpoint.key()
    }

    /// Metadata of the robot this entry configures.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::for_endpoint(&self.endpoint)
    }
}

/// Step-by-step builder for [`ConfigEntry`].
///
/// The endpoint is validated on its own construction, so building never fails.
#[derive(Debug)]
pub struct ConfigEntryBuilder {
    endpoint: DeviceEndpoint,
    entry_id: Option<EntryId>,
    title: Option<String>,
    created_at: Option<Timestamp>,
}

impl ConfigEntryBuilder {
    #[must_use]
    pub fn entry_id(mut self, entry_id: EntryId) -> Self {
        self.entry_id = Some(entry_id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Fill defaults: fresh id, `"Reachy Mini ({host})"` title, current time.
    #[must_use]
    pub fn build(self) -> ConfigEntry {
        let title = self
            .title
            .unwrap_or_else(|| display_name(self.endpoint.host()));
        ConfigEntry {
            entry_id: self.entry_id.unwrap_or_default(),
            title,
            endpoint: self.endpoint,
            created_at: self.created_at.unwrap_or_else(now),
        }
    }
}
