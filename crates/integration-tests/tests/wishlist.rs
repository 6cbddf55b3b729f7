//! Integration tests for the wishlist.

#![allow(clippy::unwrap_used)]

use market360_integration_tests::{TestContext, USER_TOKEN, deal_json, location};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_wishlist(ctx: &TestContext, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .and(header("authorization", format!("Bearer {USER_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(&ctx.api)
        .await;
}

#[tokio::test]
async fn test_wishlist_lists_saved_deals() {
    let ctx = TestContext::start().await;
    mock_wishlist(&ctx, json!([deal_json("p1", "Air Fryer")])).await;
    ctx.login_as("user").await;

    let resp = ctx.get("/wishlist").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("My Wishlist"));
    assert!(body.contains("Air Fryer at a great price..."));
    assert!(body.contains("Remove from Wishlist"));
    assert!(body.contains("/assets/placeholder.svg"));
}

#[tokio::test]
async fn test_empty_wishlist() {
    let ctx = TestContext::start().await;
    mock_wishlist(&ctx, json!([])).await;
    ctx.login_as("user").await;

    assert!(ctx.page("/wishlist").await.contains("Your wishlist is empty!"));
}

#[tokio::test]
async fn test_add_and_remove() {
    let ctx = TestContext::start().await;
    mock_wishlist(&ctx, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/wishlist/p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.api)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx.post_form("/wishlist/p1", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/wishlist"));
    assert!(ctx.page("/wishlist").await.contains("Product added to wishlist"));

    let resp = ctx.post_form("/wishlist/p1/remove", &[]).await;
    assert_eq!(location(&resp).as_deref(), Some("/wishlist"));
    assert!(ctx.page("/wishlist").await.contains("Product removed from wishlist"));
}

#[tokio::test]
async fn test_add_failure_returns_to_deal_with_message() {
    let ctx = TestContext::start().await;
    ctx.mock_deal(deal_json("p1", "Air Fryer")).await;
    Mock::given(method("POST"))
        .and(path("/api/wishlist/p1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Already in wishlist" })),
        )
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx.post_form("/wishlist/p1", &[]).await;
    assert_eq!(location(&resp).as_deref(), Some("/products/p1"));
    assert!(ctx.page("/products/p1").await.contains("Already in wishlist"));
}

#[tokio::test]
async fn test_expired_token_signs_user_out() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx.get("/wishlist").await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login?next=%2Fwishlist")
    );

    let body = ctx.page("/auth/login?next=%2Fwishlist").await;
    assert!(body.contains("Your session has expired. Please log in again."));
    assert!(body.contains("name=\"next\" value=\"/wishlist\""));

    // The session no longer carries the user.
    assert_eq!(ctx.get("/profile").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_anonymous_add_lands_on_deal_after_login() {
    let ctx = TestContext::start().await;
    ctx.mock_deal(deal_json("p1", "Air Fryer")).await;

    let resp = ctx.post_form("/wishlist/p1", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login?next=%2Fproducts%2Fp1")
    );

    let resp = ctx.login_with_next("user", Some("/products/p1")).await;
    assert_eq!(location(&resp).as_deref(), Some("/products/p1"));

    let resp = ctx.get("/products/p1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Add to Wishlist"));
}

#[tokio::test]
async fn test_anonymous_add_returns_to_referring_page() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .client
        .post(ctx.url("/wishlist/p1"))
        .header("referer", ctx.url("/products?q=fryer"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login?next=%2Fproducts%3Fq%3Dfryer")
    );
}
