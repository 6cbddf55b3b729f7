//! Embedded static assets.
//!
//! The stylesheet is served under a content hash computed by `build.rs`, so
//! it can be cached forever; a stale hash is a 404.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

const STYLESHEET: &str = include_str!("../../static/css/main.css");
const PLACEHOLDER: &str = include_str!("../../static/img/placeholder.svg");

/// Public path of the placeholder shown for deals without photos.
pub const PLACEHOLDER_PATH: &str = "/assets/placeholder.svg";

const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// File name of the current stylesheet, e.g. `main.3f2a9c1d.css`.
fn stylesheet_name() -> String {
    format!("main.{}.css", env!("CSS_HASH"))
}

/// Serve an embedded asset by file name.
pub async fn serve(Path(file): Path<String>) -> Response {
    if file == stylesheet_name() {
        return (
            [
                (header::CONTENT_TYPE, "text/css; charset=utf-8"),
                (header::CACHE_CONTROL, IMMUTABLE),
            ],
            STYLESHEET,
        )
            .into_response();
    }

    if file == "placeholder.svg" {
        return (
            [
                (header::CONTENT_TYPE, "image/svg+xml"),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            PLACEHOLDER,
        )
            .into_response();
    }

    StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_current_stylesheet_is_immutable() {
        let response = serve(Path(stylesheet_name())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], IMMUTABLE);
    }

    #[tokio::test]
    async fn test_stale_hash_is_not_found() {
        let response = serve(Path("main.00000000.css".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
