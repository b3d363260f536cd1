//! Process-wide registry of configured device keys.
//!
//! Owned by the entry service and handed by reference to the setup and
//! unload paths. There is no global instance.

use std::collections::HashSet;

use reachy_mini_domain::endpoint::DeviceKey;
use reachy_mini_domain::error::DuplicateDeviceError;

/// Set of device keys that currently own a loaded config entry.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    keys: HashSet<DeviceKey>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`, refusing a key that is already present.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateDeviceError`] when `key` is already registered.
    pub fn register(&mut self, key: DeviceKey) -> Result<(), DuplicateDeviceError> {
        if self.keys.contains(&key) {
            return Err(DuplicateDeviceError { device_key: key });
        }
        self.keys.insert(key);
        Ok(())
    }

    /// Release `key`. Returns whether it was registered.
    pub fn unregister(&mut self, key: &DeviceKey) -> bool {
        self.keys.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &DeviceKey) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachy_mini_domain::endpoint::derive_device_key;

    #[test]
    fn should_register_then_reject_same_key() {
        let mut registry = DeviceRegistry::new();
        let key = derive_device_key("10.0.0.5", 8000);
        assert_eq!(key.as_str(), "10.0.0.5:8000");

        registry.register(key.clone()).unwrap();
        let err = registry.register(key.clone()).unwrap_err();
        assert_eq!(err.device_key, key);
        assert!(registry.contains(&key));
    }

    #[test]
    fn should_accept_same_host_on_another_port() {
        let mut registry = DeviceRegistry::new();
        registry.register(derive_device_key("10.0.0.5", 8000)).unwrap();

        let other = derive_device_key("10.0.0.5", 8001);
        assert_eq!(other.as_str(), "10.0.0.5:8001");
        assert!(registry.register(other.clone()).is_ok());
        assert!(registry.contains(&other));
        assert!(registry.contains(&derive_device_key("10.0.0.5", 8000)));
    }

    #[test]
    fn should_accept_different_hosts_on_same_port() {
        let mut registry = DeviceRegistry::new();
        assert!(registry.register(derive_device_key("10.0.0.5", 8000)).is_ok());
        assert!(registry.register(derive_device_key("10.0.0.6", 8000)).is_ok());
    }

    #[test]
    fn should_allow_reregistration_after_unregister() {
        let mut registry = DeviceRegistry::new();
        let key = derive_device_key("reachy.local", 8000);
        registry.register(key.clone()).unwrap();

        assert!(registry.unregister(&key));
        assert!(!registry.contains(&key));
        assert!(registry.register(key).is_ok());
    }

    #[test]
    fn should_report_false_when_unregistering_unknown_key() {
        let mut registry = DeviceRegistry::new();
        assert!(!registry.unregister(&derive_device_key("10.0.0.5", 8000)));
    }
}
