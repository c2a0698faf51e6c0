//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use fm_common::FileManagerError;

/// Message returned in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// Handler error wrapping a [`FileManagerError`].
#[derive(Debug)]
pub struct ApiError(pub FileManagerError);

impl From<FileManagerError> for ApiError {
    fn from(err: FileManagerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        counter!("fm_request_errors_total", "kind" => self.0.kind()).increment(1);

        let message = match &self.0 {
            FileManagerError::InternalError(detail) => {
                error!(error = %detail, "Request failed with internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            err => {
                warn!(kind = err.kind(), status = status.as_u16(), error = %err, "Request failed");
                err.message().to_string()
            }
        };

        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
