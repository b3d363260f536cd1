//! Error types shared across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ReachyError`]
//! via `#[from]`. Adapter failures are boxed into [`ReachyError::Storage`]
//! or [`ReachyError::Device`].

use crate::endpoint::DeviceKey;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum ReachyError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("duplicate device")]
    Duplicate(#[from] DuplicateDeviceError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Talking to the robot failed.
    #[error("device error")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated by user or stored input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("port {0} is outside 1-65535")]
    PortOutOfRange(i64),

    #[error("port must be an integer")]
    PortNotInteger,

    #[error("battery level {0} is outside 0-100")]
    BatteryOutOfRange(u8),

    #[error("unknown entity suffix {0:?}")]
    UnknownEntitySuffix(String),

    #[error("malformed entry id {0:?}")]
    MalformedEntryId(String),

    #[error("malformed unique id {0:?}")]
    MalformedUniqueId(String),

    #[error("unknown service {0:?}")]
    UnknownService(String),

    /// A read-only entity received a service call.
    #[error("{unique_id} does not support {service}")]
    ServiceNotSupported { unique_id: String, service: String },
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A device with the same `host:port` key is already registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device {device_key} is already configured")]
pub struct DuplicateDeviceError {
    pub device_key: DeviceKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_via_from() {
        let err: ReachyError = ValidationError::EmptyHost.into();
        assert!(matches!(
            err,
            ReachyError::Validation(ValidationError::EmptyHost)
        ));
    }

    #[test]
    fn should_display_duplicate_device_key() {
        let err = DuplicateDeviceError {
            device_key: DeviceKey::from("10.0.0.5:8000"),
        };
        assert_eq!(err.to_string(), "device 10.0.0.5:8000 is already configured");
    }

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "ConfigEntry",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "ConfigEntry abc not found");
    }

    #[test]
    fn should_display_port_out_of_range() {
        assert_eq!(
            ValidationError::PortOutOfRange(65536).to_string(),
            "port 65536 is outside 1-65535"
        );
    }
}
