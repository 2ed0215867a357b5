//! Claims carried inside the bearer tokens this service issues.

use entity::Id;
use serde::{Deserialize, Serialize};

/// Claims for an authentication token issued at login or registration.
///
/// `sub` is the user's id; `exp` and `iat` are seconds since the Unix epoch.
/// Expiry is enforced by `jsonwebtoken`'s default validation on decode.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AuthClaims {
    pub(crate) sub: Id,
    pub(crate) email: String,
    pub(crate) exp: usize,
    pub(crate) iat: usize,
}
