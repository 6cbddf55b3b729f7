//! One-shot notices carried across a redirect.
//!
//! A handler pushes a flash before redirecting; the next rendered page takes
//! every pending flash and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Visual weight of a flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

/// A message shown once on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    /// CSS modifier class.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash--success",
            FlashKind::Error => "flash--error",
            FlashKind::Info => "flash--info",
        }
    }
}

/// Queue a flash for the next rendered page.
///
/// Failures are logged; a lost notice never fails the request.
pub async fn push_flash(session: &Session, flash: Flash) {
    let mut pending: Vec<Flash> = session
        .get(keys::FLASHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(flash);

    if let Err(e) = session.insert(keys::FLASHES, pending).await {
        tracing::error!("Failed to store flash message: {}", e);
    }
}

/// Remove and return every pending flash.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(keys::FLASHES).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to read flash messages: {}", e);
            Vec::new()
        }
    }
}
