//! API error handling for the Dropslot web layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// The share is password gated and no password was submitted (401).
    PasswordRequired,
    /// The submitted password does not match (401).
    PasswordRejected,
    /// Not found (404).
    NotFound,
    /// The download quota is used up (410).
    LimitReached,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::PasswordRequired => StatusCode::UNAUTHORIZED,
            ErrorCode::PasswordRejected => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::LimitReached => StatusCode::GONE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    ///
    /// The message is deliberately uniform so callers cannot distinguish
    /// "wrong code" from "code never existed".
    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "File not found")
    }

    /// Create a download-limit-reached error.
    pub fn limit_reached() -> Self {
        Self::new(ErrorCode::LimitReached, "Download limit reached")
    }

    /// Create a password-required error (first ask).
    pub fn password_required() -> Self {
        Self::new(ErrorCode::PasswordRequired, "This file requires a password")
    }

    /// Create a password-rejected error (retry after wrong password).
    pub fn password_rejected() -> Self {
        Self::new(ErrorCode::PasswordRejected, "Wrong password, try again")
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code of this error.
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<crate::DropslotError> for ApiError {
    fn from(err: crate::DropslotError) -> Self {
        match &err {
            crate::DropslotError::NotFound(_) => ApiError::not_found(),
            crate::DropslotError::Validation(msg) => ApiError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::PasswordRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PasswordRejected.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::LimitReached.status_code(), StatusCode::GONE);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        assert_eq!(ApiError::bad_request("bad").code(), ErrorCode::BadRequest);
        assert_eq!(ApiError::not_found().code(), ErrorCode::NotFound);
        assert_eq!(ApiError::limit_reached().code(), ErrorCode::LimitReached);
        assert_eq!(
            ApiError::password_required().code(),
            ErrorCode::PasswordRequired
        );
        assert_eq!(
            ApiError::password_rejected().code(),
            ErrorCode::PasswordRejected
        );
        assert_eq!(ApiError::internal("boom").code(), ErrorCode::InternalError);
    }

    #[test]
    fn test_from_dropslot_error() {
        let err: ApiError = crate::DropslotError::NotFound("file".to_string()).into();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err: ApiError = crate::DropslotError::Database("oops".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
