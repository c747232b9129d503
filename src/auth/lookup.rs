//! The one capability the auth kernel needs from the user store.

use std::future::Future;

use super::types::User;

/// Resolve users by email or id. `Ok(None)` means not found.
pub trait UserLookup: Send + Sync {
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, LookupError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<User>, LookupError>> + Send;
}

/// The backing store could not answer.
#[derive(Debug, thiserror::Error)]
#[error("user lookup failed: {0}")]
pub struct LookupError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl LookupError {
    pub fn new(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(e))
    }
}
