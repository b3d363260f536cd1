//! Simulated adapter error types.

use reachy_mini_domain::endpoint::DeviceKey;
use reachy_mini_domain::error::{ReachyError, ValidationError};

/// Errors raised by the simulated robot.
#[derive(Debug, thiserror::Error)]
pub enum SimulatedError {
    /// The robot is configured as offline.
    #[error("robot {0} is unreachable")]
    Unreachable(DeviceKey),

    /// A configured value violates a domain invariant.
    #[error("invalid simulated value")]
    InvalidValue(#[source] ValidationError),
}

impl From<SimulatedError> for ReachyError {
    fn from(err: SimulatedError) -> Self {
        match err {
            SimulatedError::InvalidValue(err) => Self::Validation(err),
            other => Self::Device(Box::new(other)),
        }
    }
}
