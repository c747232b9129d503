//! Authentication state trait.

use crate::clock::Clock;
use crate::jwt::JwtConfig;

/// Trait for state types that can verify bearer tokens.
pub trait HasAuthBackend {
    fn jwt(&self) -> &JwtConfig;
    fn clock(&self) -> &dyn Clock;
}
