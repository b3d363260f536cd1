//! Service: a command the host can send to a controllable entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Commands accepted by switches and the camera. Sensors ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    TurnOn,
    TurnOff,
    Toggle,
}

impl Service {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Toggle => "toggle",
        }
    }

    /// Resolve the target on/off value given the current one.
    #[must_use]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::TurnOn => true,
            Self::TurnOff => false,
            Self::Toggle => !current,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            "toggle" => Ok(Self::Toggle),
            other => Err(ValidationError::UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_services() {
        assert_eq!("turn_on".parse(), Ok(Service::TurnOn));
        assert_eq!("turn_off".parse(), Ok(Service::TurnOff));
        assert_eq!("toggle".parse(), Ok(Service::Toggle));
    }

    #[test]
    fn should_reject_unknown_service() {
        assert_eq!(
            "reboot".parse::<Service>(),
            Err(ValidationError::UnknownService("reboot".to_string()))
        );
    }

    #[test]
    fn should_apply_toggle_by_inverting() {
        assert!(Service::Toggle.apply(false));
        assert!(!Service::Toggle.apply(true));
        assert!(Service::TurnOn.apply(true));
        assert!(!Service::TurnOff.apply(true));
    }
}
