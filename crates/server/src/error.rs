//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures storage faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! The mapping from domain error kind to HTTP status is 1:1 with no
//! fallthrough: only storage failures collapse into a generic 500, and their
//! cause is retained for logging, never shown to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{ReviewError, UserError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Review operation failed.
    #[error("review error: {0}")]
    Review(#[from] ReviewError),

    /// User operation failed.
    #[error("user error: {0}")]
    User(#[from] UserError),

    /// Session store operation failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Request shape validation failed before reaching a service.
    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Whether this error is a server-side fault worth capturing.
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Review(ReviewError::Storage(_))
                | Self::User(UserError::Storage(_) | UserError::PasswordHash)
                | Self::Session(_)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Review(err) => match err {
                ReviewError::ProductNotFound | ReviewError::NoReviewFound => StatusCode::NOT_FOUND,
                ReviewError::ExistingReview => StatusCode::CONFLICT,
                ReviewError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::User(err) => match err {
                UserError::UserNotFound => StatusCode::NOT_FOUND,
                UserError::UserAlreadyExists => StatusCode::CONFLICT,
                UserError::UserIsAdmin
                | UserError::Unauthorized
                | UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                UserError::InvalidDate => StatusCode::BAD_REQUEST,
                UserError::PasswordHash | UserError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Client-facing message. Internal causes are never exposed.
    fn message(&self) -> String {
        if self.is_server_fault() {
            return "internal server error".to_owned();
        }
        match self {
            Self::Review(err) => err.to_string(),
            Self::User(err) => err.to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Session(_) => "internal server error".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_review_error_status_codes() {
        assert_eq!(
            get_status(ReviewError::ProductNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ReviewError::ExistingReview.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ReviewError::NoReviewFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ReviewError::Storage(RepositoryError::NotFound).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_error_status_codes() {
        assert_eq!(
            get_status(UserError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(UserError::UserNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(UserError::UserIsAdmin.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(UserError::Unauthorized.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(UserError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(UserError::InvalidDate.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_status_code() {
        assert_eq!(
            get_status(AppError::Validation("score out of range".to_owned())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = AppError::from(UserError::Storage(RepositoryError::DataCorruption(
            "invalid role in database".to_owned(),
        )));
        assert_eq!(err.message(), "internal server error");
    }
}
