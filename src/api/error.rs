//! Conversion of engine errors into HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, NerveError};

/// Error body returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

pub type ApiResult<T> = Result<T, NerveError>;

pub fn status_code(err: &NerveError) -> StatusCode {
    match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput | ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for NerveError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let message = if status.is_server_error() {
            // Details stay in the log.
            tracing::error!(code = self.code.as_str(), error = %self.message, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(code = self.code.as_str(), error = %self.message, "request rejected");
            self.message
        };
        let body = ErrorBody {
            error: message,
            code: self.code.as_str().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for NerveError {
    fn from(rejection: JsonRejection) -> Self {
        NerveError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}
