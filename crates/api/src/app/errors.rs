//! Consistent JSON error responses: every failure is `{ "error": "<message>" }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use loangate_auth::{AssignmentError, Denial, VerificationError};
use loangate_core::DomainError;

/// Body of the catch-all 500 response.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] VerificationError),

    #[error("forbidden: {0}")]
    Forbidden(#[from] Denial),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error("user lookup failed: {0}")]
    UserLookupFailed(String),

    #[error(transparent)]
    InvalidId(#[from] DomainError),

    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,
}

impl ApiError {
    /// Status and public message. Provider diagnostics beyond their message
    /// string never reach the caller.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, format!("Unauthorized: {err}")),
            ApiError::Forbidden(denial) => denial_response(*denial),
            ApiError::Assignment(AssignmentError::Forbidden(denial)) => denial_response(*denial),
            ApiError::Assignment(AssignmentError::InvalidRole(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid role".to_string())
            }
            ApiError::Assignment(AssignmentError::AssignmentFailed(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to set user role".to_string(),
            ),
            ApiError::UserLookupFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve user details".to_string(),
            ),
            ApiError::Assignment(AssignmentError::InvalidTarget(err)) | ApiError::InvalidId(err) => {
                (StatusCode::BAD_REQUEST, capitalize(&err.to_string()))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Invalid request body: {msg}")),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        }
    }
}

fn denial_response(denial: Denial) -> (StatusCode, String) {
    match denial {
        Denial::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", VerificationError::MissingCredential),
        ),
        Denial::NoRole => (StatusCode::FORBIDDEN, "Forbidden: No role found".to_string()),
        Denial::InsufficientRole => (StatusCode::FORBIDDEN, "Forbidden: Insufficient role".to_string()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(err: ApiError) -> (StatusCode, String) {
        err.status_and_message()
    }

    #[test]
    fn verification_errors_are_401() {
        assert_eq!(
            parts(VerificationError::MissingCredential.into()),
            (StatusCode::UNAUTHORIZED, "Unauthorized: No token provided".to_string())
        );
        assert_eq!(
            parts(VerificationError::InvalidCredential("token expired".to_string()).into()),
            (StatusCode::UNAUTHORIZED, "Unauthorized: token expired".to_string())
        );
        assert_eq!(parts(Denial::Unauthenticated.into()).0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn denials_are_403() {
        assert_eq!(
            parts(Denial::NoRole.into()),
            (StatusCode::FORBIDDEN, "Forbidden: No role found".to_string())
        );
        assert_eq!(
            parts(AssignmentError::Forbidden(Denial::InsufficientRole).into()),
            (StatusCode::FORBIDDEN, "Forbidden: Insufficient role".to_string())
        );
    }

    #[test]
    fn assignment_errors_map_to_fixed_bodies() {
        assert_eq!(
            parts(AssignmentError::InvalidRole("superadmin".to_string()).into()),
            (StatusCode::BAD_REQUEST, "Invalid role".to_string())
        );
        let (status, message) = parts(AssignmentError::AssignmentFailed("quota exceeded".to_string()).into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("quota"));
    }

    #[test]
    fn malformed_assignment_target_is_400() {
        let err = AssignmentError::InvalidTarget(DomainError::invalid_id("SubjectId: must not be empty"));
        assert_eq!(
            parts(err.into()),
            (StatusCode::BAD_REQUEST, "Invalid identifier: SubjectId: must not be empty".to_string())
        );
    }

    #[test]
    fn invalid_ids_are_400() {
        let (status, message) = parts(DomainError::invalid_id("SubjectId: must not be empty").into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid identifier: SubjectId: must not be empty");
    }
}
