use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::predictions::{PredictionError, PredictionService};
use crate::timezone::TimeRangeError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
    pub default_timezone: String,
}

impl AppState {
    pub fn new(prediction_service: Arc<PredictionService>, default_timezone: String) -> Self {
        Self {
            prediction_service,
            default_timezone,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::NotFound(match_id) => {
                AppError::NotFound(format!("Prediction not found: {}", match_id))
            }
            PredictionError::Repository(msg) => AppError::DatabaseError(msg),
            PredictionError::Snapshot(err) => {
                error!(error = %err, "Stored prediction book is unreadable");
                AppError::Internal
            }
        }
    }
}

impl From<TimeRangeError> for AppError {
    fn from(err: TimeRangeError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
