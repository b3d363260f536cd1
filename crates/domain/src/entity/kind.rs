//! The fixed set of entities a Reachy Mini exposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::reading::ConnectionStatus;
use crate::error::ValidationError;

/// Host platform an entity is rendered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Sensor,
    Switch,
    Camera,
}

/// One logical sub-entity of the robot. The suffix is unique per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Connection,
    Battery,
    Temperature,
    Compliance,
    Torque,
    TeleopCamera,
}

impl EntityKind {
    /// Every kind, in setup order (sensors, switches, camera).
    pub const ALL: [Self; 6] = [
        Self::Connection,
        Self::Battery,
        Self::Temperature,
        Self::Compliance,
        Self::Torque,
        Self::TeleopCamera,
    ];

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Battery => "battery",
            Self::Temperature => "temperature",
            Self::Compliance => "compliance",
            Self::Torque => "torque",
            Self::TeleopCamera => "teleop_camera",
        }
    }

    #[must_use]
    pub fn platform(self) -> Platform {
        match self {
            Self::Connection | Self::Battery | Self::Temperature => Platform::Sensor,
            Self::Compliance | Self::Torque => Platform::Switch,
            Self::TeleopCamera => Platform::Camera,
        }
    }

    #[must_use]
    pub fn friendly_name(self) -> &'static str {
        match self {
            Self::Connection => "Connection Status",
            Self::Battery => "Battery Level",
            Self::Temperature => "Temperature",
            Self::Compliance => "Compliance Mode",
            Self::Torque => "Torque",
            Self::TeleopCamera => "Teleop Camera",
        }
    }

    #[must_use]
    pub fn unit_of_measurement(self) -> Option<&'static str> {
        match self {
            Self::Battery => Some("%"),
            Self::Temperature => Some("\u{b0}C"),
            _ => None,
        }
    }

    #[must_use]
    pub fn device_class(self) -> Option<&'static str> {
        match self {
            Self::Connection => Some("enum"),
            Self::Battery => Some("battery"),
            Self::Temperature => Some("temperature"),
            _ => None,
        }
    }

    #[must_use]
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Compliance => Some("mdi:robot"),
            Self::Torque => Some("mdi:engine"),
            _ => None,
        }
    }

    /// `measurement` for sensors the host should keep statistics for.
    #[must_use]
    pub fn state_class(self) -> Option<&'static str> {
        match self {
            Self::Battery | Self::Temperature => Some("measurement"),
            _ => None,
        }
    }

    /// Allowed values of an enum sensor.
    #[must_use]
    pub fn options(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Connection => Some(ConnectionStatus::OPTIONS),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.suffix() == s)
            .ok_or_else(|| ValidationError::UnknownEntitySuffix(s.to_string()))
    }
}
