//! Entity state: what the host renders for an entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::reading::Reading;

/// Current state of an entity.
///
/// Switches are `On`/`Off`, the camera is `Idle`/`Streaming`, sensors carry a
/// [`Reading`]. `Unknown` precedes the first refresh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    Idle,
    Streaming,
    #[default]
    Unknown,
    #[serde(untagged)]
    Reading(Reading),
}

impl EntityState {
    #[must_use]
    pub fn from_switch(is_on: bool) -> Self {
        if is_on { Self::On } else { Self::Off }
    }

    #[must_use]
    pub fn from_stream(is_streaming: bool) -> Self {
        if is_streaming {
            Self::Streaming
        } else {
            Self::Idle
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Idle => f.write_str("idle"),
            Self::Streaming => f.write_str("streaming"),
            Self::Unknown => f.write_str("unknown"),
            Self::Reading(reading) => fmt::Display::fmt(reading, f),
        }
    }
}
