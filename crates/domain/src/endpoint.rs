//! Device endpoint and identity key.
//!
//! A robot is addressed by `host` + `port`. The pair, formatted as
//! `"{host}:{port}"`, is the device's identity key: it keys every entity to
//! the physical robot and is the unit of duplicate detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReachyError, ValidationError};

/// Port used when the setup form leaves `port` empty.
pub const DEFAULT_PORT: u16 = 8000;

/// Identity key of a physical device, `"{host}:{port}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceKey(String);

impl DeviceKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DeviceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Derive the identity key for a device reachable at `host:port`.
#[must_use]
pub fn derive_device_key(host: &str, port: u16) -> DeviceKey {
    DeviceKey(format!("{host}:{port}"))
}

/// Check that a raw port value lies in `1..=65535`.
///
/// # Errors
///
/// Returns [`ValidationError::PortOutOfRange`] otherwise.
pub fn validate_port(raw: i64) -> Result<u16, ValidationError> {
    u16::try_from(raw)
        .ok()
        .filter(|port| *port != 0)
        .ok_or(ValidationError::PortOutOfRange(raw))
}

/// Network location of a Reachy Mini robot.
///
/// Immutable once a config entry owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEndpoint {
    host: String,
    port: u16,
}

impl DeviceEndpoint {
    /// Build an endpoint, trimming the host.
    ///
    /// # Errors
    ///
    /// Returns [`ReachyError::Validation`] when the host is blank or the port
    /// is zero.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ReachyError> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err(ValidationError::EmptyHost.into());
        }
        let port = validate_port(i64::from(port))?;
        Ok(Self { host, port })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Identity key of the device at this endpoint.
    #[must_use]
    pub fn key(&self) -> DeviceKey {
        derive_device_key(&self.host, self.port)
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
