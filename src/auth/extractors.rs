//! Axum extractors for authentication.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use super::errors::AuthError;
use super::state::HasAuthBackend;
use super::types::AuthenticatedUser;
use crate::jwt::TokenType;

/// Extractor for endpoints that require a valid access token in
/// `Authorization: Bearer <token>`. Refresh tokens are rejected.
pub struct BearerAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::TokenInvalid)?;

        let claims = state
            .jwt()
            .verify_kind_at(token, TokenType::Access, state.clock().now())
            .map_err(|e| {
                debug!(reason = %e, "Bearer token rejected");
                AuthError::TokenInvalid
            })?;

        Ok(BearerAuth(AuthenticatedUser { claims }))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
