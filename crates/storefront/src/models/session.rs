//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use market360_core::{UserId, UserRole};

use crate::api::SessionUser;

/// Session-stored user identity.
///
/// Holds the API bearer token, which never leaves the server.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's API ID.
    pub id: UserId,
    /// Public username, if the API provided one.
    pub username: Option<String>,
    /// Email address, if the API provided one.
    pub email: Option<String>,
    /// Role granted by the API.
    pub role: UserRole,
    access_token: String,
}

impl CurrentUser {
    /// Build the session identity from a successful sign-in.
    #[must_use]
    pub fn new(access_token: String, user: SessionUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            access_token,
        }
    }

    /// Bearer token for API calls made on this user's behalf.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Whether this user may moderate deals.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name shown in the navbar.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Account")
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending flash messages.
    pub const FLASHES: &str = "flashes";
}
