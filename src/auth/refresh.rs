//! Refresh cookie validation and pair rotation.

use axum::http::HeaderMap;
use tracing::{debug, error, warn};

use super::cookie::{CookieSettings, RefreshCookie};
use super::errors::AuthError;
use super::issuer::TokenIssuer;
use super::lookup::UserLookup;
use super::types::TokenPair;
use crate::jwt::{JwtConfig, TokenType};

/// A rotated pair and the cookie that delivers its refresh half.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub pair: TokenPair,
    pub cookie: RefreshCookie,
}

/// Exchanges a valid refresh cookie for a brand-new pair.
///
/// The presented refresh token is not invalidated; it stays usable until its
/// own expiry.
pub struct RefreshFlow<'a> {
    jwt: &'a JwtConfig,
    issuer: &'a TokenIssuer,
    cookies: &'a CookieSettings,
}

impl<'a> RefreshFlow<'a> {
    pub fn new(jwt: &'a JwtConfig, issuer: &'a TokenIssuer, cookies: &'a CookieSettings) -> Self {
        Self {
            jwt,
            issuer,
            cookies,
        }
    }

    pub async fn refresh<L: UserLookup>(
        &self,
        users: &L,
        headers: &HeaderMap,
        now: u64,
    ) -> Result<RefreshOutcome, AuthError> {
        let token = self
            .cookies
            .read(headers)
            .ok_or(AuthError::RefreshTokenAbsent)?;

        let claims = self
            .jwt
            .verify_kind_at(token, TokenType::Refresh, now)
            .map_err(|e| {
                debug!(reason = %e, "Refresh token rejected");
                AuthError::TokenInvalid
            })?;

        let user_id: i64 = claims.sub.parse().map_err(|_| {
            warn!(subject = %claims.sub, "Refresh token subject is not a user id");
            AuthError::UnknownUser
        })?;

        let user = match users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id, "Refresh token for missing user");
                return Err(AuthError::UnknownUser);
            }
            Err(e) => {
                error!(user_id, error = %e, "User lookup failed during refresh");
                return Err(AuthError::UnknownUser);
            }
        };

        let pair = self.issuer.issue_at(&user, now)?;
        let cookie = self
            .cookies
            .build_set_cookie(&pair.refresh_token, pair.refresh_expires_at, now);

        Ok(RefreshOutcome { pair, cookie })
    }
}
