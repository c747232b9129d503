//! Email/password verification.

use tracing::{error, warn};

use super::errors::AuthError;
use super::lookup::UserLookup;
use super::types::User;
use crate::password::{burn_verification, verify_password};

/// Checks submitted credentials against the user store.
///
/// Every failure, whether the email is unknown, the password is wrong, the
/// stored hash is unreadable or the store is down, comes back as
/// [`AuthError::InvalidCredentials`]. An unknown email still pays for one
/// argon2 verification so that response time does not reveal which accounts
/// exist.
pub struct CredentialVerifier<'a, L> {
    users: &'a L,
}

impl<'a, L: UserLookup> CredentialVerifier<'a, L> {
    pub fn new(users: &'a L) -> Self {
        Self { users }
    }

    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "User lookup failed during login");
                None
            }
        };

        let Some(user) = user else {
            burn_verification(password);
            warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                warn!("Login rejected");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
