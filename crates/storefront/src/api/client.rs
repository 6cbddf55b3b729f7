//! `MarketClient` implementation.
//!
//! Approved listings and product details are cached (5-minute TTL by
//! default). Every mutation that touches a product drops its cached entries.

use std::sync::Arc;

use market360_core::forms::{NewDeal, ProfileUpdate};
use market360_core::{Product, ProductId, ProductStatus, RatingAction, UserId};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{AuthSession, ErrorBody, RatingRequest, SignInRequest, SignUpRequest};
use crate::config::ApiConfig;

/// Client for the Market360 REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct MarketClient {
    inner: Arc<MarketClientInner>,
}

struct MarketClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

/// Moderation decision for a pending deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    const fn path_segment(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl MarketClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("market360-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(MarketClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    /// Base URL every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(builder.send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Market API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send a request whose response body is not needed.
    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }

    async fn invalidate_product(&self, id: &ProductId) {
        let cache = &self.inner.cache;
        cache.invalidate(&CacheKey::Product(id.clone())).await;
        for key in &CacheKey::LISTINGS {
            cache.invalidate(key).await;
        }
    }

    async fn invalidate_listings(&self) {
        for key in &CacheKey::LISTINGS {
            self.inner.cache.invalidate(key).await;
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials, or any transport error.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = SignInRequest { email, password };
        self.send_json(self.request(Method::POST, "/auth/signin", None).json(&body))
            .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns the API's rejection (duplicate email, mismatched passwords...).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, "/auth/signup", None).json(request))
            .await
    }

    /// Revoke the bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, "/auth/signout", Some(token)))
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List deals, optionally filtered by moderation status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_products(
        &self,
        status: Option<ProductStatus>,
        token: Option<&str>,
    ) -> Result<Vec<Product>, ApiError> {
        let cacheable = CacheKey::is_cacheable_listing(status);
        let cache_key = CacheKey::Products(status);

        if cacheable
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let path = status.map_or_else(
            || "/products".to_owned(),
            |s| format!("/products?status={}", s.as_str()),
        );
        let products: Vec<Product> = self
            .send_json(self.request(Method::GET, &path, token))
            .await?;

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a single deal.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the deal does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/products/{}", urlencoding::encode(id.as_str()));
        let product: Product = self
            .send_json(self.request(Method::GET, &path, None))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Submit a new deal for moderation.
    ///
    /// # Errors
    ///
    /// Returns the API's rejection or a transport error.
    #[instrument(skip(self, deal, token), fields(title = %deal.title))]
    pub async fn create_product(&self, deal: &NewDeal, token: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.request(Method::POST, "/products", Some(token))
                .json(deal),
        )
        .await?;
        self.invalidate_listings().await;
        Ok(())
    }

    /// Record a like or dislike and return the deal as the API now sees it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id, user_id = %user))]
    pub async fn rate_product(
        &self,
        id: &ProductId,
        action: RatingAction,
        user: &UserId,
        token: &str,
    ) -> Result<Product, ApiError> {
        let path = format!("/products/{}/rating", urlencoding::encode(id.as_str()));
        let body = RatingRequest {
            action,
            user_id: user,
        };

        let product: Product = self
            .send_json(self.request(Method::POST, &path, Some(token)).json(&body))
            .await?;
        self.invalidate_product(id).await;
        Ok(product)
    }

    /// Approve a pending deal.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin tokens, or any transport error.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn approve_product(&self, id: &ProductId, token: &str) -> Result<(), ApiError> {
        self.moderate_product(id, Decision::Approve, token).await
    }

    /// Reject a pending deal.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin tokens, or any transport error.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn reject_product(&self, id: &ProductId, token: &str) -> Result<(), ApiError> {
        self.moderate_product(id, Decision::Reject, token).await
    }

    /// Apply a moderation decision to a pending deal.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin tokens, or any transport error.
    pub async fn moderate_product(
        &self,
        id: &ProductId,
        decision: Decision,
        token: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/products/{}/{}",
            urlencoding::encode(id.as_str()),
            decision.path_segment()
        );
        self.send_empty(self.request(Method::POST, &path, Some(token)))
            .await?;
        self.invalidate_product(id).await;
        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Deals on the signed-in user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_wishlist(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        self.send_json(self.request(Method::GET, "/wishlist", Some(token)))
            .await
    }

    /// Add a deal to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn add_to_wishlist(&self, id: &ProductId, token: &str) -> Result<(), ApiError> {
        let path = format!("/wishlist/{}", urlencoding::encode(id.as_str()));
        self.send_empty(self.request(Method::POST, &path, Some(token)))
            .await
    }

    /// Remove a deal from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn remove_from_wishlist(&self, id: &ProductId, token: &str) -> Result<(), ApiError> {
        let path = format!("/wishlist/{}", urlencoding::encode(id.as_str()));
        self.send_empty(self.request(Method::DELETE, &path, Some(token)))
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Save profile changes.
    ///
    /// # Errors
    ///
    /// Returns the API's rejection (wrong current password...) or a transport
    /// error.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, profile: &ProfileUpdate, token: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.request(Method::PUT, "/users/profile", Some(token))
                .json(profile),
        )
        .await
    }

    /// Whether the API answers HTTP at all.
    pub async fn is_reachable(&self) -> bool {
        self.request(Method::GET, "/products", None)
            .send()
            .await
            .is_ok_and(|response| !response.status().is_server_error())
    }
}

/// Map non-success responses onto `ApiError`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    let path = response.url().path().to_owned();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    tracing::warn!(
        status = %status,
        path = %path,
        api_message = message.as_deref().unwrap_or(""),
        "Market API returned non-success status"
    );

    Err(match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(path),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use market360_core::forms::DealForm;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> MarketClient {
        let mut config = ApiConfig::new(Url::parse(&format!("{}/api", server.uri())).unwrap());
        config.timeout = Duration::from_secs(2);
        MarketClient::new(&config).unwrap()
    }

    fn product_json(id: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "title": "Air Fryer",
            "description": "5.5L basket",
            "salePrice": 79.99,
            "listPrice": 129.99,
            "store": "Amazon",
            "likes": [],
            "dislikes": [],
            "status": "approved"
        })
    }

    #[tokio::test]
    async fn test_list_products_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json("p1")])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let first = client.list_products(None, None).await.unwrap();
        let second = client.list_products(None, None).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_pending_listing_is_never_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("status", "pending"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        for _ in 0..2 {
            let pending = client
                .list_products(Some(ProductStatus::Pending), Some("admin-token"))
                .await
                .unwrap();
            assert!(pending.is_empty());
        }
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "nope" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .get_product(&ProductId::new("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products/p1/approve"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "Already approved" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .approve_product(&ProductId::new("p1"), "admin-token")
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed to approve product"), "Already approved");
    }

    #[tokio::test]
    async fn test_non_json_error_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/wishlist"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_wishlist("token").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 502, message: None }));
        assert_eq!(err.user_message("Failed to load wishlist"), "Failed to load wishlist");
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products/p1/reject"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Admins only" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .reject_product(&ProductId::new("p1"), "user-token")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.api_message(), Some("Admins only"));
    }

    #[tokio::test]
    async fn test_rate_limited_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.list_products(None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_sign_in_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .and(body_json(json!({ "email": "a@b.co", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt",
                "user": { "_id": "u1", "username": "abc" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let session = client.sign_in("a@b.co", "pw").await.unwrap();
        assert_eq!(session.token(), "jwt");
        assert_eq!(session.user.id.as_str(), "u1");
    }

    #[tokio::test]
    async fn test_rating_invalidates_cached_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p1")))
            .expect(2)
            .mount(&server)
            .await;

        let mut rated = product_json("p1");
        rated["likes"] = json!(["u1"]);
        Mock::given(method("POST"))
            .and(path("/api/products/p1/rating"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({ "action": "like", "userId": "u1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(rated))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let id = ProductId::new("p1");
        let user = UserId::new("u1");

        client.get_product(&id).await.unwrap();
        client.get_product(&id).await.unwrap();
        let updated = client
            .rate_product(&id, RatingAction::Like, &user, "tok")
            .await
            .unwrap();
        assert!(updated.is_liked_by(&user));

        // Cache was dropped, so this goes back to the API
        client.get_product(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_product_sends_camel_case_deal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(201).set_body_json(product_json("new")))
            .expect(1)
            .mount(&server)
            .await;

        let deal = DealForm {
            deal_url: "https://shop.example.com/deal".to_string(),
            title: "Kettle".to_string(),
            sale_price: "20".to_string(),
            list_price: "40".to_string(),
            description: "1.7L".to_string(),
            category: "Home & Garden".to_string(),
            store: "Argos".to_string(),
        }
        .validate()
        .unwrap();

        let client = client_for(&server).await;
        client.create_product(&deal, "tok").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["dealUrl"], "https://shop.example.com/deal");
        assert_eq!(body["listPrice"], "40");
    }

    #[tokio::test]
    async fn test_wishlist_remove_uses_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/wishlist/p%201"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .remove_from_wishlist(&ProductId::new("p 1"), "tok")
            .await
            .unwrap();
    }
}
