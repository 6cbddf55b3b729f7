//! Per-request chrome shared by every full page.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::flash::{Flash, take_flashes};
use super::session::{CurrentUser, keys};

/// What the navbar and flash area need on every page.
///
/// Extracting it consumes the pending flashes, so take it only in handlers
/// that render a full page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    /// Whether the signed-in user may moderate.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }

    /// Load the signed-in user and take the pending flashes.
    ///
    /// For handlers that only sometimes render a page, such as a form post
    /// that redirects on success.
    pub async fn load(session: &Session) -> Self {
        let user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let flashes = take_flashes(session).await;

        Self { user, flashes }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::load(session).await),
            None => Ok(Self::default()),
        }
    }
}
