//! Bearer-protected endpoints.
//!
//! - GET `/verify` - Check that the presented access token is still valid

use axum::{Json, Router, routing::get};
use serde::Serialize;

use super::AuthState;
use crate::auth::BearerAuth;

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/verify", get(verify_token))
        .with_state(state)
}

#[derive(Serialize)]
struct SessionInfo {
    subject: String,
    expires_at: u64,
}

#[derive(Serialize)]
struct VerifyResponse {
    error: bool,
    message: &'static str,
    data: SessionInfo,
}

/// Returns 200 if the access token is valid, 401 if not.
async fn verify_token(BearerAuth(auth): BearerAuth) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        error: false,
        message: "token valid",
        data: SessionInfo {
            subject: auth.claims.sub,
            expires_at: auth.claims.exp,
        },
    })
}
