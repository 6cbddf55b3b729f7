//! Integration tests for the profile form.

#![allow(clippy::unwrap_used)]

use market360_integration_tests::{TestContext, USER_TOKEN, location};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const CURRENT: &str = "Old-Password#2024x";
const STRONG: &str = "Sunny-Deals#2025abc";

#[tokio::test]
async fn test_invalid_profile_is_rerendered_without_calling_api() {
    let ctx = TestContext::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx
        .post_form(
            "/profile",
            &[
                ("full_name", "Asha R4o"),
                ("email", "asha@market360.com"),
                ("gender", "female"),
                ("country", "India"),
                ("current_password", CURRENT),
                ("new_password", "short"),
                ("retype_new_password", "different"),
            ],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Only letters and spaces are allowed"));
    assert!(body.contains("Password must be at least 16 characters."));
    assert!(body.contains("Passwords do not match."));
    assert!(body.contains("value=\"Asha R4o\""));
}

#[tokio::test]
async fn test_valid_profile_sends_sanitized_update() {
    let ctx = TestContext::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(header("authorization", format!("Bearer {USER_TOKEN}")))
        .and(body_json(json!({
            "fullName": "Asha Rao",
            "email": "asha@market360.com",
            "gender": "female",
            "country": "India",
            "currentPassword": CURRENT,
            "newPassword": STRONG,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx
        .post_form(
            "/profile",
            &[
                ("full_name", "Asha Rao"),
                ("email", " asha!@market360.com "),
                ("gender", "female"),
                ("country", "India"),
                ("current_password", CURRENT),
                ("new_password", STRONG),
                ("retype_new_password", STRONG),
            ],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/profile"));
    assert!(ctx.page("/profile").await.contains("Profile updated"));
}

#[tokio::test]
async fn test_profile_api_failure_shows_message() {
    let ctx = TestContext::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Current password is wrong" })),
        )
        .mount(&ctx.api)
        .await;
    ctx.login_as("user").await;

    let resp = ctx
        .post_form(
            "/profile",
            &[
                ("full_name", "Asha Rao"),
                ("email", "asha@market360.com"),
                ("gender", "female"),
                ("country", "India"),
                ("current_password", CURRENT),
                ("new_password", STRONG),
                ("retype_new_password", STRONG),
            ],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.text().await.unwrap().contains("Current password is wrong"));
}
