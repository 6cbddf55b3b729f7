//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Landing page
//! GET  /assets/{file}                 - Fingerprinted stylesheet, placeholder image
//!
//! # Deals
//! GET  /products                      - Catalog grid (q, min, max, category filters)
//! POST /products                      - Submit a deal (auth)
//! GET  /products/new                  - Deal submission form (auth)
//! GET  /products/{id}                 - Deal detail (?image= selects gallery photo)
//! POST /products/{id}/like            - Toggle like (auth, HTMX fragment)
//! POST /products/{id}/dislike         - Toggle dislike (auth, HTMX fragment)
//!
//! # Wishlist (requires auth)
//! GET  /wishlist                      - Wishlist
//! POST /wishlist/{id}                 - Add a deal
//! POST /wishlist/{id}/remove          - Remove a deal
//!
//! # Moderation (requires admin)
//! GET  /admin                         - Pending deals
//! POST /admin/products/{id}/approve   - Approve a deal
//! POST /admin/products/{id}/reject    - Reject a deal
//!
//! # Profile (requires auth)
//! GET  /profile                       - Profile form (?show_password=1 reveals passwords)
//! POST /profile                       - Validate and save
//!
//! # Auth
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Login action
//! GET  /auth/register                 - Register page
//! POST /auth/register                 - Register action
//! POST /auth/logout                   - Logout action
//!
//! # Pages
//! GET  /pages/refund-policy           - Refund, returns, shipping and privacy policy
//! ```

pub mod admin;
pub mod assets;
pub mod auth;
pub mod home;
pub mod pages;
pub mod products;
pub mod profile;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{action_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Credential posts sit behind the strict limiter.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/logout", post(auth::logout))
        .merge(limited)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    let ratings = Router::new()
        .route("/{id}/like", post(products::like))
        .route("/{id}/dislike", post(products::dislike))
        .layer(action_rate_limiter());

    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", get(products::show))
        .merge(ratings)
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    let changes = Router::new()
        .route("/{id}", post(wishlist::add))
        .route("/{id}/remove", post(wishlist::remove))
        .layer(action_rate_limiter());

    Router::new().route("/", get(wishlist::index)).merge(changes)
}

/// Create the moderation routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/products/{id}/approve", post(admin::approve))
        .route("/products/{id}/reject", post(admin::reject))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/assets/{file}", get(assets::serve))
        .nest("/products", product_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/admin", admin_routes())
        .route("/profile", get(profile::show).post(profile::update))
        .nest("/auth", auth_routes())
        .nest("/pages", pages::router())
}
