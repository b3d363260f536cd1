//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod config_flow;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod entries;
pub mod sse;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post};

use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};
use reachy_mini_domain::error::{ReachyError, ValidationError};
use reachy_mini_domain::id::EntryId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, I, EP>() -> Router<AppState<R, I, EP>>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Config flow
        .route(
            "/config_flow/user",
            get(config_flow::show::<R, I, EP>).post(config_flow::submit::<R, I, EP>),
        )
        // Config entries
        .route("/entries", get(entries::list::<R, I, EP>))
        .route(
            "/entries/{id}",
            get(entries::get::<R, I, EP>).delete(entries::delete::<R, I, EP>),
        )
        .route(
            "/entries/{id}/entities",
            get(entities::list_for_entry::<R, I, EP>),
        )
        // Entities
        .route(
            "/entities/{unique_id}/camera_image",
            get(entities::camera_image::<R, I, EP>),
        )
        .route(
            "/entities/{unique_id}/stream_source",
            get(entities::stream_source::<R, I, EP>),
        )
        .route(
            "/entities/{unique_id}/{service}",
            post(entities::call_service::<R, I, EP>),
        )
        // Events
        .route("/events/stream", get(sse::stream::<R, I, EP>))
}

fn parse_entry_id(raw: &str) -> Result<EntryId, ApiError> {
    EntryId::from_str(raw).map_err(|_| {
        ApiError::from(ReachyError::Validation(ValidationError::MalformedEntryId(
            raw.to_string(),
        )))
    })
}
