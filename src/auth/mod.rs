//! Stateless JWT authentication.
//!
//! Dual-token system: short-lived access tokens presented as bearer credentials
//! and longer-lived refresh tokens delivered only through an HttpOnly cookie.
//! Nothing is stored server side; validity is re-derived from the signature and
//! expiry on every use.

mod cookie;
mod credentials;
mod errors;
mod extractors;
mod issuer;
mod lookup;
mod refresh;
mod state;
mod types;

pub use cookie::{CookieSettings, REFRESH_COOKIE_NAME, RefreshCookie, get_cookie};
pub use credentials::CredentialVerifier;
pub use errors::AuthError;
pub use extractors::BearerAuth;
pub use issuer::{ACCESS_TOKEN_LIFETIME, REFRESH_TOKEN_LIFETIME, TokenIssuer, TokenLifetimes};
pub use lookup::{LookupError, UserLookup};
pub use refresh::{RefreshFlow, RefreshOutcome};
pub use state::HasAuthBackend;
pub use types::{AuthenticatedUser, TokenPair, User};
