//! Login, refresh and logout endpoints.
//!
//! - POST `/authenticate` - Exchange email/password for a token pair
//! - GET|POST `/refresh` - Exchange the refresh cookie for a rotated pair
//! - GET|POST `/logout` - Expire the refresh cookie

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthState;
use super::error::ApiError;
use crate::auth::{CredentialVerifier, RefreshCookie, RefreshFlow, TokenPair};

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/authenticate", post(authenticate))
        .route("/refresh", get(refresh).post(refresh))
        .route("/logout", get(logout).post(logout))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Body returned by login and refresh. The refresh token only travels in the
/// cookie.
#[derive(Serialize)]
struct TokenResponse {
    access_token: String,
    access_token_expires_at: u64,
}

fn token_response(pair: TokenPair, cookie: RefreshCookie) -> Response {
    (
        StatusCode::OK,
        [(SET_COOKIE, cookie.to_string())],
        Json(TokenResponse {
            access_token: pair.access_token,
            access_token_expires_at: pair.access_expires_at,
        }),
    )
        .into_response()
}

async fn authenticate(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(payload) = payload.map_err(|e| ApiError::from(e).into_response())?;

    let users = state.db.users();
    let user = CredentialVerifier::new(&users)
        .verify(&payload.email, &payload.password)
        .await
        .map_err(IntoResponse::into_response)?;

    let now = state.clock.now();
    let pair = state
        .issuer
        .issue_at(&user, now)
        .map_err(IntoResponse::into_response)?;
    let cookie = state
        .cookies
        .build_set_cookie(&pair.refresh_token, pair.refresh_expires_at, now);

    info!(user_id = user.id, "User logged in");
    Ok(token_response(pair, cookie))
}

async fn refresh(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let flow = RefreshFlow::new(&state.jwt, &state.issuer, &state.cookies);
    match flow
        .refresh(&state.db.users(), &headers, state.clock.now())
        .await
    {
        Ok(outcome) => token_response(outcome.pair, outcome.cookie),
        Err(e) => e.into_response(),
    }
}

/// Expire the refresh cookie. Requires no token and changes no server state.
async fn logout(State(state): State<AuthState>) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        [(SET_COOKIE, state.cookies.build_expire_cookie().to_string())],
    )
}
