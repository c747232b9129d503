//! JWT token signing and verification.
//!
//! Every token is an HS256 JWT over a fixed, versioned [`Claims`] schema. The
//! token class (access or refresh) is carried explicitly in the `typ` claim so
//! that a token minted for one purpose cannot be replayed for the other.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

/// Current claims schema version.
pub const CLAIMS_VERSION: u8 = 1;

/// How far in the future `iat` may lie before a token is rejected.
/// Expiry is checked without any allowance.
pub const CLOCK_SKEW_SECS: u64 = 30;

/// Token class for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented as a bearer credential
    Access,
    /// Long-lived token carried in the refresh cookie
    Refresh,
}

/// Signed payload shared by access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject (user id as a decimal string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Unique token id
    pub jti: String,
    /// Token class
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Schema version
    #[serde(rename = "ver")]
    pub version: u8,
}

/// Signing key plus the issuer and audience every token must carry.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8], issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Build claims for `subject` stamped with this config's issuer and audience.
    pub fn claims(
        &self,
        subject: impl Into<String>,
        token_type: TokenType,
        issued_at: u64,
        lifetime_secs: u64,
    ) -> Claims {
        Claims {
            sub: subject.into(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime_secs),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type,
            version: CLAIMS_VERSION,
        }
    }

    /// Sign claims into a compact JWT.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(JwtError::Encoding)
    }

    /// Verify a token against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, SystemClock.now())
    }

    /// Verify signature, issuer, audience, schema and expiry as of `now`.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss", "aud"]);

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::from_decode)?
            .claims;

        if claims.version != CLAIMS_VERSION || claims.exp <= claims.iat {
            return Err(JwtError::Malformed);
        }
        if now >= claims.exp {
            return Err(JwtError::Expired);
        }
        if claims.iat > now.saturating_add(CLOCK_SKEW_SECS) {
            return Err(JwtError::IssuedInFuture);
        }

        Ok(claims)
    }

    /// Verify a token and require it to be of the given class.
    pub fn verify_kind_at(
        &self,
        token: &str,
        token_type: TokenType,
        now: u64,
    ) -> Result<Claims, JwtError> {
        let claims = self.verify_at(token, now)?;
        if claims.token_type != token_type {
            return Err(JwtError::WrongTokenType);
        }
        Ok(claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
    #[error("token issuer or audience does not match")]
    ClaimMismatch,
    #[error("token was issued in the future")]
    IssuedInFuture,
    #[error("wrong token type")]
    WrongTokenType,
}

impl JwtError {
    fn from_decode(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::SignatureInvalid,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => Self::ClaimMismatch,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}
