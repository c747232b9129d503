//! Access/refresh pair issuance.

use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use super::errors::AuthError;
use super::types::{TokenPair, User};
use crate::jwt::{Claims, JwtConfig, TokenType};

/// Default access token lifetime: 15 minutes
pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime: 24 hours
pub const REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Expiry policy for the two token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: ACCESS_TOKEN_LIFETIME,
            refresh: REFRESH_TOKEN_LIFETIME,
        }
    }
}

/// Mints signed token pairs. Holds no state beyond its configuration.
#[derive(Clone)]
pub struct TokenIssuer {
    jwt: Arc<JwtConfig>,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(jwt: Arc<JwtConfig>, lifetimes: TokenLifetimes) -> Self {
        Self { jwt, lifetimes }
    }

    /// Issue a fresh pair for `user` as of `now`.
    pub fn issue_at(&self, user: &User, now: u64) -> Result<TokenPair, AuthError> {
        let subject = user.id.to_string();

        let access = self.jwt.claims(
            subject.clone(),
            TokenType::Access,
            now,
            self.lifetimes.access.as_secs(),
        );
        let refresh = self.jwt.claims(
            subject,
            TokenType::Refresh,
            now,
            self.lifetimes.refresh.as_secs(),
        );

        let sign = |claims: &Claims| {
            self.jwt.sign(claims).map_err(|e| {
                error!(user_id = user.id, error = %e, "Failed to sign token");
                AuthError::IssuanceFailure
            })
        };

        Ok(TokenPair {
            access_token: sign(&access)?,
            refresh_token: sign(&refresh)?,
            access_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn issuer() -> (TokenIssuer, Arc<JwtConfig>) {
        let jwt = Arc::new(JwtConfig::new(b"issuer-test-secret", "reelpass", "web"));
        (TokenIssuer::new(jwt.clone(), TokenLifetimes::default()), jwt)
    }

    fn user() -> User {
        User {
            id: 7,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_pair_has_distinct_expiries() {
        let (issuer, jwt) = issuer();
        let pair = issuer.issue_at(&user(), NOW).unwrap();

        assert_eq!(pair.access_expires_at, NOW + 15 * 60);
        assert_eq!(pair.refresh_expires_at, NOW + 24 * 60 * 60);

        let access = jwt
            .verify_kind_at(&pair.access_token, TokenType::Access, NOW)
            .unwrap();
        let refresh = jwt
            .verify_kind_at(&pair.refresh_token, TokenType::Refresh, NOW)
            .unwrap();

        assert_eq!(access.sub, "7");
        assert_eq!(refresh.sub, "7");
        assert_eq!(access.iat, NOW);
        assert_eq!(refresh.iat, NOW);
        assert_eq!(access.iss, refresh.iss);
        assert_eq!(access.aud, refresh.aud);
    }

    #[test]
    fn test_access_token_expires_before_refresh_token() {
        let (issuer, jwt) = issuer();
        let pair = issuer.issue_at(&user(), NOW).unwrap();
        let later = NOW + 15 * 60;

        assert!(jwt.verify_at(&pair.access_token, later).is_err());
        assert!(jwt.verify_at(&pair.refresh_token, later).is_ok());
    }

    #[test]
    fn test_custom_lifetimes() {
        let jwt = Arc::new(JwtConfig::new(b"issuer-test-secret", "reelpass", "web"));
        let issuer = TokenIssuer::new(
            jwt,
            TokenLifetimes {
                access: Duration::from_secs(60),
                refresh: Duration::from_secs(600),
            },
        );
        let pair = issuer.issue_at(&user(), NOW).unwrap();

        assert_eq!(pair.access_expires_at, NOW + 60);
        assert_eq!(pair.refresh_expires_at, NOW + 600);
    }

    #[test]
    fn test_longest_lifetime_yields_usable_refresh_token() {
        let jwt = Arc::new(JwtConfig::new(b"issuer-test-secret", "reelpass", "web"));
        let year = Duration::from_secs(365 * 24 * 60 * 60);
        let issuer = TokenIssuer::new(
            jwt.clone(),
            TokenLifetimes {
                access: ACCESS_TOKEN_LIFETIME,
                refresh: year,
            },
        );
        let pair = issuer.issue_at(&user(), NOW).unwrap();

        assert_eq!(pair.refresh_expires_at, NOW + year.as_secs());
        let later = NOW + year.as_secs() - 1;
        assert!(
            jwt.verify_kind_at(&pair.refresh_token, TokenType::Refresh, later)
                .is_ok()
        );
    }

    #[test]
    fn test_same_second_pairs_differ() {
        let (issuer, _) = issuer();
        let a = issuer.issue_at(&user(), NOW).unwrap();
        let b = issuer.issue_at(&user(), NOW).unwrap();

        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.refresh_token, b.refresh_token);
    }
}
