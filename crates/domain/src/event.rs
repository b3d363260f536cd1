//! Event: an immutable record of something that happened.

use serde::{Deserialize, Serialize};

use crate::id::{EntryId, EventId};
use crate::time::{Timestamp, now};

/// Kind of a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    EntryCreated,
    EntryRemoved,
    StateChanged,
}

impl EventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EntryCreated => "entry_created",
            Self::EntryRemoved => "entry_removed",
            Self::StateChanged => "state_changed",
        }
    }
}

/// A published domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub entry_id: Option<EntryId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    #[must_use]
    pub fn new(event_type: EventType, entry_id: Option<EntryId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entry_id,
            data,
            timestamp: now(),
        }
    }
}
