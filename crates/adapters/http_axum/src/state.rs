//! Shared application state for axum handlers.

use std::sync::Arc;

use reachy_mini_app::event_bus::InProcessEventBus;
use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};
use reachy_mini_app::services::entry_service::EntryService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository, integration and event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`.
pub struct AppState<R, I, EP> {
    pub entry_service: Arc<EntryService<R, I, EP>>,
    /// Bus the SSE endpoint subscribes to.
    pub event_bus: InProcessEventBus,
}

impl<R, I, EP> Clone for AppState<R, I, EP> {
    fn clone(&self) -> Self {
        Self {
            entry_service: Arc::clone(&self.entry_service),
            event_bus: self.event_bus.clone(),
        }
    }
}

impl<R, I, EP> AppState<R, I, EP>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    pub fn new(entry_service: EntryService<R, I, EP>, event_bus: InProcessEventBus) -> Self {
        Self::from_arc(Arc::new(entry_service), event_bus)
    }

    /// Build from a service already shared with startup code.
    pub fn from_arc(
        entry_service: Arc<EntryService<R, I, EP>>,
        event_bus: InProcessEventBus,
    ) -> Self {
        Self {
            entry_service,
            event_bus,
        }
    }
}
