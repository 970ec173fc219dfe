//! Authenticated user identity as exposed by the hosted identity provider.

use serde::{Deserialize, Serialize};

/// The identity attributes the client keeps after a successful auth check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    pub email: String,
    /// Stable subject identifier from the identity provider.
    pub sub: String,
}
