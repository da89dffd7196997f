//! Axum handler for the fulfillment endpoint.
//!
//! Translates the dispatch outcome (or failure) into an HTTP response.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use converse_core::HandlerRequest;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::{app::DispatchError, state::AppState};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub enum ApiError {
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::HandlerNotFound(name) => {
                Self::NotFound(format!("No handler registered for handle name '{name}'"))
            }
            DispatchError::Internal(err) => Self::InternalServerError(err),
        }
    }
}

/// Runs one fulfillment turn and answers with the dispatcher's status and
/// serialized body.
pub async fn fulfillment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<HandlerRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.app.dispatch(body, &headers).await?;
    Ok((outcome.status, Json(outcome.body)).into_response())
}
