use crate::services::CheckFailure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_INPUT_MESSAGE: &str = "No text or file provided";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error processing plagiarism check.";

/// Errors surfaced by the check endpoint.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("no text or file provided")]
    InvalidInput,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("upstream failure: {0}")]
    UpstreamFailure(#[from] CheckFailure),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CheckError::InvalidInput => (StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE.to_string()),
            CheckError::MalformedBody(detail) => {
                tracing::debug!(error = %detail, "Rejected malformed check request");
                (StatusCode::BAD_REQUEST, "Malformed request body".to_string())
            }
            CheckError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Uploaded file is too large".to_string(),
            ),
            CheckError::UpstreamFailure(err) => {
                // Details stay in the logs.
                tracing::error!(error = %err, "Plagiarism check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
