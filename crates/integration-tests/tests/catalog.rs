//! Integration tests for the public catalog, detail pages and health checks.

#![allow(clippy::unwrap_used)]

use market360_integration_tests::{TestContext, deal_json};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn book(id: &str, title: &str) -> serde_json::Value {
    let mut deal = deal_json(id, title);
    deal["category"] = json!("Books");
    deal["salePrice"] = json!(12);
    deal["store"] = json!("Bookshop");
    deal
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_and_readiness() {
    let ctx = TestContext::start().await;
    ctx.mock_catalog(vec![]).await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    assert_eq!(ctx.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_when_api_errors() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.api)
        .await;

    assert_eq!(
        ctx.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_pages_carry_security_headers_and_request_id() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));

    let body = resp.text().await.unwrap();
    assert!(body.contains("MARKET FOR ALL YOUR NEEDS"));
    assert!(body.contains("SHOP NOW"));
    assert!(body.contains(
        "Market360 is community-supported. We may get paid by brands for deals, including promoted items."
    ));
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_catalog_lists_deals() {
    let ctx = TestContext::start().await;
    ctx.mock_catalog(vec![deal_json("p1", "Air Fryer"), book("p2", "Dune")])
        .await;

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Air Fryer"));
    assert!(body.contains("Dune"));
    assert!(body.contains("50% OFF"));
    assert!(body.contains("Apply Filters"));
    assert!(body.contains("From: Amazon"));
    assert!(body.contains("From: Bookshop"));
    assert!(body.contains(
        r#"<a href="https://shop.example/p1" class="button button--small" target="_blank" rel="noopener noreferrer">View Deal</a>"#
    ));
}

#[tokio::test]
async fn test_catalog_tolerates_null_fields() {
    let ctx = TestContext::start().await;
    let mut sparse = deal_json("p0", "Mystery Box");
    sparse["description"] = json!(null);
    sparse["salePrice"] = json!(null);
    sparse["dealUrl"] = json!("javascript:alert(1)");
    ctx.mock_catalog(vec![sparse, deal_json("p1", "Air Fryer")]).await;

    let body = ctx.page("/products").await;
    assert!(!body.contains("Failed to load products"));
    assert!(body.contains("Mystery Box"));
    assert!(body.contains("Air Fryer"));
    assert!(!body.contains("javascript:"));
}

#[tokio::test]
async fn test_catalog_category_and_search_filters() {
    let ctx = TestContext::start().await;
    ctx.mock_catalog(vec![deal_json("p1", "Air Fryer"), book("p2", "Dune")])
        .await;

    let body = ctx.page("/products?category=Books").await;
    assert!(body.contains("Dune"));
    assert!(!body.contains("Air Fryer"));

    let body = ctx.page("/products?q=fryer").await;
    assert!(body.contains("Air Fryer"));
    assert!(!body.contains("Dune"));

    let body = ctx.page("/products?min=20&max=1000").await;
    assert!(body.contains("Air Fryer"));
    assert!(!body.contains("Dune"));
}

#[tokio::test]
async fn test_catalog_shows_api_failure_inline() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.api)
        .await;

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Failed to load products"));
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_page() {
    let ctx = TestContext::start().await;
    ctx.mock_deal(deal_json("p1", "Air Fryer")).await;

    let resp = ctx.get("/products/p1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Get Deal at Amazon"));
    assert!(body.contains("https://shop.example/p1"));
    assert!(body.contains("$50.00"));
    assert!(body.contains("$100.00"));
    assert!(body.contains("Add to Wishlist"));
}

#[tokio::test]
async fn test_detail_bad_image_selection_shows_first_photo() {
    let ctx = TestContext::start().await;
    let mut deal = deal_json("p1", "Air Fryer");
    deal["images"] = json!([{ "url": "https://img.example/1.jpg" }, { "url": "https://img.example/2.jpg" }]);
    ctx.mock_deal(deal).await;

    for selection in ["-1", "abc", "99"] {
        let resp = ctx.get(&format!("/products/p1?image={selection}")).await;
        assert_eq!(resp.status(), StatusCode::OK, "image={selection}");
        let body = resp.text().await.unwrap();
        assert!(
            body.contains(r#"<img src="https://img.example/1.jpg" alt="Air Fryer" class="deal__image">"#),
            "image={selection}"
        );
    }

    let body = ctx.page("/products/p1?image=1").await;
    assert!(body.contains(r#"<img src="https://img.example/2.jpg" alt="Air Fryer" class="deal__image">"#));
}

#[tokio::test]
async fn test_missing_deal_renders_not_found() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&ctx.api)
        .await;

    let resp = ctx.get("/products/gone").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Product Not Found"));
    assert!(body.contains("Return to Deals"));
}

#[tokio::test]
async fn test_refund_policy_page() {
    let ctx = TestContext::start().await;

    let body = ctx.page("/pages/refund-policy").await;
    assert!(body.contains("Refund Policy &amp; Returns"));
    assert!(body.contains("id=\"privacy\""));
}

#[tokio::test]
async fn test_stylesheet_is_served_under_its_hash() {
    let ctx = TestContext::start().await;

    let home = ctx.page("/").await;
    let start = home.find("/assets/main.").unwrap();
    let end = start + home[start..].find(".css").unwrap() + ".css".len();
    let href = &home[start..end];

    let resp = ctx.get(href).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()["cache-control"]
            .to_str()
            .unwrap()
            .contains("immutable")
    );

    assert_eq!(
        ctx.get("/assets/main.stale.css").await.status(),
        StatusCode::NOT_FOUND
    );
}
