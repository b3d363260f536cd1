//! Event bus port: publish domain events to whoever listens.

use std::future::Future;

use reachy_mini_domain::error::ReachyError;
use reachy_mini_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), ReachyError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), ReachyError>> + Send {
        (**self).publish(event)
    }
}
