//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};

use crate::state::AppState;

/// `GET /api/events/stream`: SSE stream of domain events.
///
/// Each domain event is sent as a JSON `data:` frame named after its event
/// type. The stream ends when the client disconnects.
pub async fn stream<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default()
                .event(event.event_type.as_str())
                .data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
