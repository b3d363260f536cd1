//! Device metadata shared by every entity of one robot.

use serde::{Deserialize, Serialize};

use crate::endpoint::{DeviceEndpoint, DeviceKey};

/// Integration domain, first half of every device identifier.
pub const DOMAIN: &str = "reachy_mini";
pub const MANUFACTURER: &str = "Pollen Robotics";
pub const MODEL: &str = "Reachy Mini";
pub const SW_VERSION: &str = "1.0";

/// Descriptive information about the physical robot an entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(domain, device_key)` pairs identifying the robot.
    pub identifiers: Vec<(String, DeviceKey)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: String,
}

impl DeviceInfo {
    #[must_use]
    pub fn for_endpoint(endpoint: &DeviceEndpoint) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_string(), endpoint.key())],
            name: display_name(endpoint.host()),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            sw_version: SW_VERSION.to_string(),
        }
    }
}

/// Human-readable robot name, also used as config entry title.
#[must_use]
pub fn display_name(host: &str) -> String {
    format!("{MODEL} ({host})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_identify_device_by_domain_and_key() {
        let endpoint = DeviceEndpoint::new("10.0.0.5", 8000).unwrap();
        let info = DeviceInfo::for_endpoint(&endpoint);
        assert_eq!(
            info.identifiers,
            vec![("reachy_mini".to_string(), DeviceKey::from("10.0.0.5:8000"))]
        );
    }

    #[test]
    fn should_fill_pollen_metadata() {
        let endpoint = DeviceEndpoint::new("reachy.local", 8000).unwrap();
        let info = DeviceInfo::for_endpoint(&endpoint);
        assert_eq!(info.name, "Reachy Mini (reachy.local)");
        assert_eq!(info.manufacturer, "Pollen Robotics");
        assert_eq!(info.model, "Reachy Mini");
        assert_eq!(info.sw_version, "1.0");
    }
}
