//! Request and response bodies for the auth and rating endpoints.

use market360_core::{RatingAction, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// `POST /auth/signin` body.
#[derive(Debug, Serialize)]
pub(crate) struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/signup` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub confirm_password: String,
}

/// `POST /products/{id}/rating` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RatingRequest<'a> {
    pub action: RatingAction,
    pub user_id: &'a UserId,
}

/// The signed-in user as described by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    /// Name shown in the navbar.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Account")
    }
}

/// Successful sign-in: the bearer token and who it belongs to.
#[derive(Clone, Deserialize)]
pub struct AuthSession {
    token: String,
    pub user: SessionUser,
}

impl AuthSession {
    /// Bearer token for subsequent calls.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Split into token and user.
    #[must_use]
    pub fn into_parts(self) -> (String, SessionUser) {
        (self.token, self.user)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
