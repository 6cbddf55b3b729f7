//! Integration tests for login, registration, logout and protected pages.

#![allow(clippy::unwrap_used)]

use market360_integration_tests::{TestContext, location};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_protected_page_redirects_to_login_with_next() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/wishlist").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login?next=%2Fwishlist")
    );

    let resp = ctx.get("/products/new").await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login?next=%2Fproducts%2Fnew")
    );
}

#[tokio::test]
async fn test_login_sets_session_and_lands_on_catalog() {
    let ctx = TestContext::start().await;
    ctx.mock_catalog(vec![]).await;

    let resp = ctx.login_as("user").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/products"));

    let body = ctx.page("/products").await;
    assert!(body.contains("Logout"));
    assert!(body.contains("user_one"));
    assert!(body.contains("href=\"/wishlist\""));
    assert!(!body.contains("href=\"/admin\""));
}

#[tokio::test]
async fn test_login_honours_safe_next_only() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t",
            "user": { "_id": "u1", "email": "a@b.co" }
        })))
        .mount(&ctx.api)
        .await;

    let resp = ctx
        .post_form(
            "/auth/login",
            &[("email", "a@b.co"), ("password", "pw"), ("next", "/wishlist")],
        )
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/wishlist"));

    let resp = ctx
        .post_form(
            "/auth/login",
            &[("email", "a@b.co"), ("password", "pw"), ("next", "//evil.example")],
        )
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/products"));
}

#[tokio::test]
async fn test_login_failure_shows_api_message() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&ctx.api)
        .await;

    let resp = ctx
        .post_form(
            "/auth/login",
            &[("email", "shopper@market360.com"), ("password", "nope")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains("value=\"shopper@market360.com\""));
}

#[tokio::test]
async fn test_register_validates_before_calling_api() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.api)
        .await;

    let resp = ctx
        .post_form(
            "/auth/register",
            &[
                ("username", "hunter"),
                ("email", "hunter@market360.com"),
                ("password", "one"),
                ("confirm_password", "two"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Passwords do not match."));
}

#[tokio::test]
async fn test_register_success_redirects_to_login_with_flash() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&ctx.api)
        .await;

    let resp = ctx
        .post_form(
            "/auth/register",
            &[
                ("username", "hunter"),
                ("email", "hunter@market360.com"),
                ("password", "same"),
                ("confirm_password", "same"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/auth/login"));

    let body = ctx.page("/auth/login").await;
    assert!(body.contains("Account created. Please log in."));

    // Flashes are shown once.
    let body = ctx.page("/auth/login").await;
    assert!(!body.contains("Account created. Please log in."));
}

#[tokio::test]
async fn test_logout_revokes_token_and_clears_session() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.api)
        .await;

    ctx.login_as("user").await;

    let resp = ctx.post_form("/auth/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/"));

    let body = ctx.page("/").await;
    assert!(body.contains("You have been logged out."));
    assert!(body.contains("Sign Up"));

    assert_eq!(ctx.get("/profile").await.status(), StatusCode::SEE_OTHER);
}
