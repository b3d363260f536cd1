//! Config flow: the single `user` setup step.
//!
//! Validates the submitted form, detects already-configured devices and
//! decides what the host should do next. The flow never touches storage;
//! [`EntryService`](super::entry_service::EntryService) acts on its decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::endpoint::{DEFAULT_PORT, DeviceEndpoint, validate_port};
use reachy_mini_domain::entity::EntityDescriptor;
use reachy_mini_domain::error::ValidationError;

use crate::registry::DeviceRegistry;

pub const STEP_USER: &str = "user";
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";
pub const ERROR_REQUIRED: &str = "required";
pub const ERROR_INVALID_PORT: &str = "invalid_port";

/// Raw form submission.
///
/// `port` accepts an integer or a string of digits; anything else is an
/// invalid port. A `host` that is not a string counts as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default, deserialize_with = "host_or_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<serde_json::Value>,
}

fn host_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(host) => Ok(Some(host)),
        _ => Ok(None),
    }
}

impl UserInput {
    #[must_use]
    pub fn new(host: impl Into<String>, port: Option<i64>) -> Self {
        Self {
            host: Some(host.into()),
            port: port.map(serde_json::Value::from),
        }
    }
}

/// What the flow decided for a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep {
    /// Show (or re-show) the form with per-field error codes.
    ShowForm {
        errors: BTreeMap<String, String>,
    },
    Abort {
        reason: String,
    },
    Create {
        endpoint: DeviceEndpoint,
    },
}

/// Result reported back to the configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    Form {
        step_id: String,
        errors: BTreeMap<String, String>,
    },
    Abort {
        reason: String,
    },
    CreateEntry {
        entry: ConfigEntry,
        entities: Vec<EntityDescriptor>,
    },
}

impl FlowResult {
    #[must_use]
    pub fn form(errors: BTreeMap<String, String>) -> Self {
        Self::Form {
            step_id: STEP_USER.to_string(),
            errors,
        }
    }

    #[must_use]
    pub fn already_configured() -> Self {
        Self::Abort {
            reason: ABORT_ALREADY_CONFIGURED.to_string(),
        }
    }
}

/// Run the `user` step against the currently registered devices.
#[must_use]
pub fn step_user(registry: &DeviceRegistry, input: Option<UserInput>) -> FlowStep {
    let Some(input) = input else {
        return FlowStep::ShowForm {
            errors: BTreeMap::new(),
        };
    };

    let endpoint = match validate_input(&input) {
        Ok(endpoint) => endpoint,
        Err(errors) => return FlowStep::ShowForm { errors },
    };

    if registry.contains(&endpoint.key()) {
        tracing::info!(device_key = %endpoint.key(), "device already configured");
        return FlowStep::Abort {
            reason: ABORT_ALREADY_CONFIGURED.to_string(),
        };
    }

    FlowStep::Create { endpoint }
}

/// Validate the form fields, collecting one error code per bad field.
///
/// # Errors
///
/// Returns the field → error-code map when any field is invalid.
pub fn validate_input(input: &UserInput) -> Result<DeviceEndpoint, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    let host = input
        .host
        .as_deref()
        .map(str::trim)
        .filter(|host| !host.is_empty());
    if host.is_none() {
        errors.insert("host".to_string(), ERROR_REQUIRED.to_string());
    }

    let port = match parse_port(input.port.as_ref()) {
        Ok(port) => Some(port),
        Err(err) => {
            tracing::debug!(error = %err, "rejected port");
            errors.insert("port".to_string(), ERROR_INVALID_PORT.to_string());
            None
        }
    };

    match (host, port) {
        (Some(host), Some(port)) if errors.is_empty() => {
            DeviceEndpoint::new(host, port).map_err(|err| {
                tracing::debug!(error = %err, "rejected endpoint");
                BTreeMap::from([("base".to_string(), "invalid_endpoint".to_string())])
            })
        }
        _ => Err(errors),
    }
}

fn parse_port(raw: Option<&serde_json::Value>) -> Result<u16, ValidationError> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(DEFAULT_PORT),
        Some(serde_json::Value::Number(number)) => number
            .as_i64()
            .ok_or(ValidationError::PortNotInteger)
            .and_then(validate_port),
        Some(serde_json::Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::PortNotInteger)
            .and_then(validate_port),
        Some(_) => Err(ValidationError::PortNotInteger),
    }
}
