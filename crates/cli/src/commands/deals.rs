//! Deal moderation commands.
//!
//! # Usage
//!
//! ```bash
//! # Deals waiting for review
//! m360-cli deals list --status pending
//!
//! # Inspect, then decide
//! m360-cli deals show 65f1c0ffee
//! m360-cli deals approve 65f1c0ffee
//! m360-cli deals reject 65f1c0ffee
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_API_URL` - Base URL of the Market360 REST API
//! - `MARKET_API_TOKEN` - Admin bearer token (moderation and pending listings)

use std::fmt::Write as _;

use market360_core::{Product, ProductId, ProductStatus};
use market360_storefront::api::{ApiError, MarketClient};
use market360_storefront::config::{ApiConfig, ConfigError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during deal commands.
#[derive(Debug, Error)]
pub enum DealsError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// API settings could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API rejected the call or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Unknown `--status` value.
    #[error("Invalid status: {0}. Valid statuses: pending, approved, rejected")]
    InvalidStatus(String),
}

/// Connection to the API plus the optional admin token.
pub struct Session {
    client: MarketClient,
    token: Option<SecretString>,
}

impl Session {
    /// Build a client from `MARKET_API_URL` and `MARKET_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the client cannot be built.
    pub fn from_env() -> Result<Self, DealsError> {
        dotenvy::dotenv().ok();

        let config = ApiConfig::from_env()?;
        let token = std::env::var("MARKET_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        Self::new(&config, token).map_err(DealsError::from)
    }

    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, token: Option<SecretString>) -> Result<Self, ApiError> {
        Ok(Self {
            client: MarketClient::new(config)?,
            token,
        })
    }

    fn token(&self) -> Option<&str> {
        self.token.as_ref().map(ExposeSecret::expose_secret)
    }

    fn require_token(&self) -> Result<&str, DealsError> {
        self.token()
            .ok_or(DealsError::MissingEnvVar("MARKET_API_TOKEN"))
    }
}

/// Parse a `--status` argument.
///
/// # Errors
///
/// Returns `InvalidStatus` for anything but pending, approved or rejected.
pub fn parse_status(raw: &str) -> Result<ProductStatus, DealsError> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| DealsError::InvalidStatus(raw.to_owned()))
}

/// List deals, optionally restricted to one moderation status.
///
/// Returns the deals in API order.
///
/// # Errors
///
/// Returns an error if the status is invalid, a pending listing is requested
/// without a token, or the API call fails.
pub async fn list(session: &Session, status: Option<&str>) -> Result<Vec<Product>, DealsError> {
    let status = status.map(parse_status).transpose()?;
    let token = match status {
        Some(ProductStatus::Pending) => Some(session.require_token()?),
        _ => session.token(),
    };

    let deals = session.client.list_products(status, token).await?;
    tracing::info!("Fetched {} deals", deals.len());
    Ok(deals)
}

/// Fetch one deal.
///
/// # Errors
///
/// Returns `NotFound` (via the API error) if the deal does not exist.
pub async fn show(session: &Session, id: &str) -> Result<Product, DealsError> {
    Ok(session.client.get_product(&ProductId::new(id)).await?)
}

/// Approve a pending deal.
///
/// # Errors
///
/// Returns an error if no token is configured or the API refuses.
pub async fn approve(session: &Session, id: &str) -> Result<(), DealsError> {
    let token = session.require_token()?;
    session
        .client
        .approve_product(&ProductId::new(id), token)
        .await?;
    tracing::info!("Deal {} approved", id);
    Ok(())
}

/// Reject a pending deal.
///
/// # Errors
///
/// Returns an error if no token is configured or the API refuses.
pub async fn reject(session: &Session, id: &str) -> Result<(), DealsError> {
    let token = session.require_token()?;
    session
        .client
        .reject_product(&ProductId::new(id), token)
        .await?;
    tracing::info!("Deal {} rejected", id);
    Ok(())
}

/// One line per deal: id, status, sale price, title.
#[must_use]
pub fn summary_line(deal: &Product) -> String {
    format!(
        "{:<26} {:<9} {:>10}  {}",
        deal.id.as_str(),
        deal.status.as_str(),
        deal.sale_price.display(),
        deal.title
    )
}

/// Multi-line description of a deal.
#[must_use]
pub fn detail(deal: &Product) -> String {
    let mut out = format!(
        "{}\n  id:       {}\n  status:   {}\n  price:    {} (list {}, {}% off)\n  store:    {}\n  category: {}\n  creator:  {}\n",
        deal.title,
        deal.id,
        deal.status.as_str(),
        deal.sale_price.display(),
        deal.list_price.display(),
        deal.discount_percent(),
        deal.store.as_deref().unwrap_or("N/A"),
        deal.category.as_deref().unwrap_or("N/A"),
        deal.creator_name(),
    );
    if let Some(url) = deal.deal_url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "  url:      {url}");
    }
    let _ = writeln!(
        out,
        "  votes:    {} up / {} down",
        deal.likes.len(),
        deal.dislikes.len()
    );
    if !deal.description.trim().is_empty() {
        let _ = write!(out, "\n{}\n", deal.description);
    }
    out
}
