//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failures surfaced by login, refresh and bearer checks.
///
/// Messages are generic. The verification step that failed is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("refresh token absent")]
    RefreshTokenAbsent,
    #[error("unauthorized")]
    TokenInvalid,
    #[error("unauthorized")]
    UnknownUser,
    #[error("error generating tokens")]
    IssuanceFailure,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::RefreshTokenAbsent | AuthError::TokenInvalid | AuthError::UnknownUser => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::IssuanceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: bool,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: true,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
