//! JSON handlers for the `user` config-flow step.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use reachy_mini_app::ports::{ConfigEntryRepository, EventPublisher, Integration};
use reachy_mini_app::services::config_flow::{FlowResult, UserInput};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the flow endpoints.
pub enum FlowResponse {
    /// Form or abort: the flow did not create anything.
    Ok(Json<FlowResult>),
    Created(Json<FlowResult>),
}

impl From<FlowResult> for FlowResponse {
    fn from(result: FlowResult) -> Self {
        match result {
            FlowResult::CreateEntry { .. } => Self::Created(Json(result)),
            other => Self::Ok(Json(other)),
        }
    }
}

impl IntoResponse for FlowResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/config_flow/user`: the empty form.
pub async fn show<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
) -> Result<FlowResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let result = state.entry_service.submit_user_step(None).await?;
    Ok(result.into())
}

/// `POST /api/config_flow/user`: submit `{host, port?}`.
pub async fn submit<R, I, EP>(
    State(state): State<AppState<R, I, EP>>,
    Json(input): Json<UserInput>,
) -> Result<FlowResponse, ApiError>
where
    R: ConfigEntryRepository + Send + Sync + 'static,
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let result = state.entry_service.submit_user_step(Some(input)).await?;
    Ok(result.into())
}
