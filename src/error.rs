use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for every record-store operation. Services convert these
/// into sentinel values at their public boundary; the axum layer converts
/// them into the standard `{"success": false, "error": ...}` wrap.
#[derive(Error, Debug)]
pub enum FieldhandError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("Record not found")]
    NotFound,

    #[error("Invalid record payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type FieldhandResult<T> = Result<T, FieldhandError>;

impl IntoResponse for FieldhandError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            FieldhandError::Transport(ref e) => {
                tracing::error!("Transport error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Could not reach the record storage service.".to_string(),
                )
            }
            FieldhandError::Backend(msg) => (StatusCode::BAD_GATEWAY, msg),
            FieldhandError::Rejected(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            FieldhandError::NotFound => (StatusCode::NOT_FOUND, "Record not found".to_string()),
            FieldhandError::Decode(ref e) => {
                tracing::error!("Decode error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The record storage service returned an unreadable response.".to_string(),
                )
            }
            FieldhandError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
