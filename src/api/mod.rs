mod admin;
mod auth;
mod error;
mod home;

use axum::Router;
use std::sync::Arc;

use crate::auth::{CookieSettings, HasAuthBackend, TokenIssuer};
use crate::clock::Clock;
use crate::db::Database;
use crate::jwt::JwtConfig;

/// Everything the auth endpoints need, shared across requests.
#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub issuer: TokenIssuer,
    pub cookies: Arc<CookieSettings>,
    pub clock: Arc<dyn Clock>,
}

impl HasAuthBackend for AuthState {
    fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Create the API router.
pub fn create_api_router(state: AuthState) -> Router {
    Router::new()
        .merge(home::router())
        .merge(auth::router(state.clone()))
        .nest("/admin", admin::router(state))
}
