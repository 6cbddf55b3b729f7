//! Client for the remote Market360 REST API.
//!
//! # Architecture
//!
//! - JSON over HTTP with `reqwest`, bearer token per request
//! - The API is the source of truth; nothing is persisted locally
//! - Public catalog reads cached in memory via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use market360_storefront::api::MarketClient;
//!
//! let client = MarketClient::new(&config.api)?;
//!
//! let session = client.sign_in("shopper@market360.com", "hunter2").await?;
//! let deals = client.list_products(None, None).await?;
//! client.add_to_wishlist(&deals[0].id, session.token()).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::{Decision, MarketClient};
pub use types::{AuthSession, SessionUser, SignUpRequest};

use thiserror::Error;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status}{}", format_message(.message.as_deref()))]
    Api {
        status: u16,
        /// `message` field of the JSON error body, when present.
        message: Option<String>,
    },

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, expired or insufficient credentials.
    #[error("Unauthorized{}", format_message(.0.as_deref()))]
    Unauthorized(Option<String>),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

fn format_message(message: Option<&str>) -> String {
    message.map(|m| format!(" - {m}")).unwrap_or_default()
}

impl ApiError {
    /// Message supplied by the API itself, suitable for showing to the user.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api {
                message: Some(message),
                ..
            }
            | Self::Unauthorized(Some(message)) => Some(message),
            _ => None,
        }
    }

    /// The API's own message, or `fallback` when it gave none.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.api_message().unwrap_or(fallback).to_owned()
    }

    /// Whether the resource was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the session token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_api_message() {
        let err = ApiError::Api {
            status: 400,
            message: Some("Title already listed".to_string()),
        };
        assert_eq!(err.user_message("Failed"), "Title already listed");
        assert_eq!(err.to_string(), "API error: 400 - Title already listed");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to load wishlist"), "Failed to load wishlist");
        assert_eq!(err.to_string(), "API error: 500");

        let err = ApiError::NotFound("/products/x".to_string());
        assert_eq!(err.user_message("Failed"), "Failed");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unauthorized_message() {
        let err = ApiError::Unauthorized(Some("Admins only".to_string()));
        assert!(err.is_unauthorized());
        assert_eq!(err.api_message(), Some("Admins only"));
        assert_eq!(ApiError::Unauthorized(None).to_string(), "Unauthorized");
    }
}
