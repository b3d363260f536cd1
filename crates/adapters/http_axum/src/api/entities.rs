//! JSON REST handlers for entities.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};
use reachy_mini_domain::entity::EntitySnapshot;

use super::parse_entry_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the camera image endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Possible responses from the snapshot endpoints.
pub enum ListResponse {
    Ok(Json<Vec<EntitySnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

pub enum ServiceResponse {
    Ok(Json<EntitySnapshot>),
}

impl IntoResponse for ServiceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

pub enum ImageResponse {
    Jpeg(Vec<u8>),
    /// The camera has no frame to offer.
    NoContent,
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Jpeg(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

#[derive(Serialize)]
pub struct StreamSource {
    pub url: Option<String>,
}

/// `GET /api/entries/{id}/entities`: refreshed snapshots of an entry.
pub async fn list_for_entry<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path(id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&id)?;
    let snapshots = state.entry_service.entity_states(entry_id).await?;
    Ok(ListResponse::Ok(Json(snapshots)))
}

/// `POST /api/entities/{unique_id}/{service}`
pub async fn call_service<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path((unique_id, service)): Path<(String, String)>,
) -> Result<ServiceResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let snapshot = state
        .entry_service
        .call_service(&unique_id, &service)
        .await?;
    Ok(ServiceResponse::Ok(Json(snapshot)))
}

/// `GET /api/entities/{unique_id}/camera_image?width=&height=`
pub async fn camera_image<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path(unique_id): Path<String>,
    Query(params): Query<ImageQuery>,
) -> Result<ImageResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let image = state
        .entry_service
        .camera_image(&unique_id, params.width, params.height)
        .await?;
    Ok(image.map_or(ImageResponse::NoContent, ImageResponse::Jpeg))
}

/// `GET /api/entities/{unique_id}/stream_source`
pub async fn stream_source<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Path(unique_id): Path<String>,
) -> Result<Json<StreamSource>, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let url = state.entry_service.stream_source(&unique_id).await?;
    Ok(Json(StreamSource { url }))
}
