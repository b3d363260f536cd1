//! Sensor readings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Link state between the hub and the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// Values the host may render for the enum sensor.
    pub const OPTIONS: &[&str] = &["connected", "disconnected"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery charge percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// # Errors
    ///
    /// Returns [`ValidationError::BatteryOutOfRange`] above 100.
    pub fn new(percent: u8) -> Result<Self, ValidationError> {
        if percent > 100 {
            return Err(ValidationError::BatteryOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BatteryLevel> for u8 {
    fn from(value: BatteryLevel) -> Self {
        value.0
    }
}

/// A single value produced by a readable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Connection(ConnectionStatus),
    Battery(BatteryLevel),
    /// Degrees Celsius.
    Temperature(f64),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(status) => fmt::Display::fmt(status, f),
            Self::Battery(level) => fmt::Display::fmt(&level.percent(), f),
            Self::Temperature(celsius) => fmt::Display::fmt(celsius, f),
        }
    }
}
