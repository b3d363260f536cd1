//! Simulated integration configuration.

use serde::Deserialize;

/// Values reported by the simulated robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Battery percentage reported by the battery sensor.
    pub battery_level: u8,
    /// Temperature in degrees Celsius reported by the temperature sensor.
    pub temperature_celsius: f64,
    /// When `false`, every read and command fails as if the robot were
    /// offline.
    pub reachable: bool,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            battery_level: 85,
            temperature_celsius: 35.5,
            reachable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_placeholder_defaults() {
        let config = SimulatedConfig::default();
        assert_eq!(config.battery_level, 85);
        assert!((config.temperature_celsius - 35.5).abs() < f64::EPSILON);
        assert!(config.reachable);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: SimulatedConfig = toml::from_str("reachable = false").unwrap();
        assert!(!config.reachable);
        assert_eq!(config.battery_level, 85);
    }
}
