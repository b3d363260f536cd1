//! JSON REST handlers for config entries.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};
use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::device::DeviceInfo;

use super::parse_entry_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ConfigEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// A config entry together with the robot it describes.
#[derive(Serialize)]
pub struct EntryDetails {
    #[serde(flatten)]
    pub entry: ConfigEntry,
    pub device: DeviceInfo,
}

impl From<ConfigEntry> for EntryDetails {
    fn from(entry: ConfigEntry) -> Self {
        let device = entry.device_info();
        Self { entry, device }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<EntryDetails>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

#[derive(Serialize)]
struct RefusedBody {
    error: &'static str,
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
    /// The integration refused to unload; the entry is kept.
    Refused,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
            Self::Refused => (
                StatusCode::CONFLICT,
                Json(RefusedBody {
                    error: "entry could not be unloaded",
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /api/entries`
pub async fn list<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
) -> Result<ListResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let entries = state.entry_service.list_entries().await?;
    Ok(ListResponse::Ok(Json(entries)))
}

/// `GET /api/entries/{id}`
pub async fn get<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&id)?;
    let entry = state.entry_service.get_entry(entry_id).await?;
    Ok(GetResponse::Ok(Json(entry.into())))
}

/// `DELETE /api/entries/{id}`: unload the entry and forget it.
pub async fn delete<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&id)?;
    if state.entry_service.unload_entry(entry_id).await? {
        Ok(DeleteResponse::NoContent)
    } else {
        Ok(DeleteResponse::Refused)
    }
}
