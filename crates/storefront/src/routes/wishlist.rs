//! Wishlist route handlers (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use market360_core::{Product, ProductId};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Flash, PageContext, push_flash};
use crate::routes::assets::PLACEHOLDER_PATH;
use crate::routes::auth::expire_session;
use crate::routes::products::EXCERPT_CHARS;
use crate::state::AppState;

/// A saved deal as listed on the wishlist.
#[derive(Debug, Clone)]
pub struct WishlistItem {
    pub id: String,
    pub title: String,
    pub image: String,
    pub excerpt: String,
    pub sale_price: String,
    pub list_price: String,
    pub store: String,
}

impl From<&Product> for WishlistItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            image: product
                .primary_image()
                .unwrap_or(PLACEHOLDER_PATH)
                .to_owned(),
            excerpt: product.excerpt(EXCERPT_CHARS),
            sale_price: product.sale_price.display(),
            list_price: product.list_price.display(),
            store: product.store.clone().unwrap_or_default(),
        }
    }
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/index.html")]
pub struct WishlistTemplate {
    pub page: PageContext,
    pub items: Vec<WishlistItem>,
    pub error: Option<String>,
}

/// Display the wishlist.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Response {
    let (items, error) = match state.api().get_wishlist(user.access_token()).await {
        Ok(products) => (products.iter().map(WishlistItem::from).collect(), None),
        Err(e) if e.is_unauthorized() => return expire_session(&session, "/wishlist").await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load wishlist");
            (Vec::new(), Some(e.user_message("Failed to load wishlist")))
        }
    };

    WishlistTemplate { page, items, error }.into_response()
}

/// Add a deal to the wishlist and return to it.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    let back = format!("/products/{product_id}");

    match state
        .api()
        .add_to_wishlist(&product_id, user.access_token())
        .await
    {
        Ok(()) => {
            push_flash(&session, Flash::success("Product added to wishlist")).await;
            Redirect::to("/wishlist").into_response()
        }
        Err(e) if e.is_unauthorized() => expire_session(&session, &back).await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add to wishlist");
            push_flash(
                &session,
                Flash::error(e.user_message("Failed to add product")),
            )
            .await;
            Redirect::to(&back).into_response()
        }
    }
}

/// Remove a deal from the wishlist.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);

    match state
        .api()
        .remove_from_wishlist(&product_id, user.access_token())
        .await
    {
        Ok(()) => {
            push_flash(&session, Flash::success("Product removed from wishlist")).await;
        }
        Err(e) if e.is_unauthorized() => return expire_session(&session, "/wishlist").await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to remove from wishlist");
            push_flash(
                &session,
                Flash::error(e.user_message("Failed to remove product")),
            )
            .await;
        }
    }

    Redirect::to("/wishlist").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_excerpt_and_placeholder() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "w1",
            "title": "Desk",
            "description": "x".repeat(150),
            "salePrice": 80,
            "listPrice": 120,
            "store": "IKEA",
        }))
        .unwrap();

        let item = WishlistItem::from(&product);
        assert_eq!(item.excerpt.len(), EXCERPT_CHARS + 3);
        assert!(item.excerpt.ends_with("..."));
        assert_eq!(item.image, PLACEHOLDER_PATH);
        assert_eq!(item.list_price, "$120.00");
    }
}
