//! Integration test harness for Market360.
//!
//! Each [`TestContext`] boots the full storefront router on an ephemeral port
//! in front of a `wiremock` stand-in for the remote REST API, then drives it
//! with a cookie-keeping `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p market360-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await;
//! ctx.mock_catalog(vec![deal_json("p1", "Air Fryer")]).await;
//!
//! let resp = ctx.get("/products").await;
//! assert!(resp.text().await.unwrap().contains("Air Fryer"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::time::Duration;

use market360_storefront::config::{ApiConfig, StorefrontConfig};
use market360_storefront::state::AppState;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client address the proxy headers claim; the rate limiters key on it.
pub const CLIENT_IP: &str = "203.0.113.7";

/// Bearer token the mock API hands out on sign-in.
pub const USER_TOKEN: &str = "user-token";

/// Bearer token for the admin account.
pub const ADMIN_TOKEN: &str = "admin-token";

/// A running storefront, its mock API and a browser-like client.
pub struct TestContext {
    pub api: MockServer,
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Boot the storefront against a fresh mock API.
    pub async fn start() -> Self {
        let api = MockServer::start().await;

        let mut api_config = ApiConfig::new(
            Url::parse(&format!("{}/api", api.uri())).expect("mock server URI is a URL"),
        );
        api_config.timeout = Duration::from_secs(2);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
            api: api_config,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("Failed to build app state");
        let app = market360_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(CLIENT_IP));

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api,
            client,
            base_url,
        }
    }

    /// Absolute URL of a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a storefront path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to a storefront path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET a path and return its body.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("body is text")
    }

    /// Serve `deals` from the public catalog endpoint.
    pub async fn mock_catalog(&self, deals: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(deals)))
            .mount(&self.api)
            .await;
    }

    /// Serve one deal from the detail endpoint.
    pub async fn mock_deal(&self, deal: Value) {
        let id = deal["_id"].as_str().expect("deal has an _id").to_owned();
        Mock::given(method("GET"))
            .and(path(format!("/api/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(deal))
            .mount(&self.api)
            .await;
    }

    /// Sign in through the login form as a user with `role`.
    ///
    /// Returns the response of the login post (a redirect on success).
    pub async fn login_as(&self, role: &str) -> Response {
        self.login_with_next(role, None).await
    }

    /// Sign in as `role`, submitting `next` the way the login page does.
    pub async fn login_with_next(&self, role: &str, next: Option<&str>) -> Response {
        let (email, token) = if role == "admin" {
            ("admin@market360.com", ADMIN_TOKEN)
        } else {
            ("shopper@market360.com", USER_TOKEN)
        };

        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .and(body_json(json!({ "email": email, "password": "correct horse" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": token,
                "user": {
                    "_id": format!("{role}-1"),
                    "username": format!("{role}_one"),
                    "email": email,
                    "role": role,
                }
            })))
            .mount(&self.api)
            .await;

        let mut form = vec![("email", email), ("password", "correct horse")];
        if let Some(next) = next {
            form.push(("next", next));
        }
        self.post_form("/auth/login", &form).await
    }
}

/// A minimal approved deal document as the API returns it.
#[must_use]
pub fn deal_json(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": format!("{title} at a great price"),
        "salePrice": 50,
        "listPrice": 100,
        "category": "Electronics",
        "store": "Amazon",
        "dealUrl": format!("https://shop.example/{id}"),
        "images": [],
        "likes": [],
        "dislikes": [],
        "status": "approved",
    })
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
