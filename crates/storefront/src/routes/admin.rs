//! Moderation console route handlers (requires admin).
//!
//! Lists deals awaiting review and forwards approve/reject decisions. The
//! pending listing is never cached, so a decision disappears from the table on
//! the redirect that follows it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;
use tracing::instrument;

use market360_core::{Product, ProductId, ProductStatus};

use crate::api::Decision;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Flash, PageContext, push_flash};
use crate::routes::assets::PLACEHOLDER_PATH;
use crate::routes::auth::expire_session;
use crate::routes::products::EXCERPT_CHARS;
use crate::state::AppState;

/// One row of the moderation table.
#[derive(Debug, Clone)]
pub struct PendingRow {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub has_image: bool,
    pub excerpt: String,
    pub sale_price: String,
    pub list_price: String,
    pub store: String,
    pub created_at: String,
    pub creator: String,
    pub deal_url: Option<String>,
}

impl From<&Product> for PendingRow {
    fn from(product: &Product) -> Self {
        let image = product.primary_image();
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            thumbnail: image.unwrap_or(PLACEHOLDER_PATH).to_owned(),
            has_image: image.is_some(),
            excerpt: product.excerpt(EXCERPT_CHARS),
            sale_price: product.sale_price.display(),
            list_price: product.list_price.display(),
            store: product.store.clone().unwrap_or_default(),
            created_at: product
                .created_at
                .as_ref()
                .map_or_else(|| "Invalid Date".to_owned(), format_created_at),
            creator: product.creator_name().to_owned(),
            deal_url: product.deal_link().map(str::to_owned),
        }
    }
}

/// `3/14/2025, 9:05:00 AM` style timestamp.
fn format_created_at(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Moderation dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub page: PageContext,
    pub rows: Vec<PendingRow>,
    pub error: Option<String>,
}

/// Display deals awaiting moderation.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
) -> Response {
    let pending = state
        .api()
        .list_products(Some(ProductStatus::Pending), Some(admin.access_token()))
        .await;

    let (rows, error) = match pending {
        Ok(products) => (products.iter().map(PendingRow::from).collect(), None),
        Err(e) if e.is_unauthorized() => return expire_session(&session, "/admin").await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load pending products");
            (
                Vec::new(),
                Some(e.user_message("Failed to load pending products")),
            )
        }
    };

    AdminTemplate { page, rows, error }.into_response()
}

/// Approve a pending deal.
pub async fn approve(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    moderate(&state, &session, admin.access_token(), id, Decision::Approve).await
}

/// Reject a pending deal.
pub async fn reject(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    moderate(&state, &session, admin.access_token(), id, Decision::Reject).await
}

/// Flash shown after a decision went through.
fn decided_flash(decision: Decision) -> Flash {
    match decision {
        Decision::Approve => Flash::success("Product approved"),
        Decision::Reject => Flash::error("Product rejected"),
    }
}

/// Fallback shown when the API rejects a decision without a message.
const fn failure_fallback(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => "Failed to approve product",
        Decision::Reject => "Failed to reject product",
    }
}

#[instrument(skip(state, session, token))]
async fn moderate(
    state: &AppState,
    session: &Session,
    token: &str,
    id: String,
    decision: Decision,
) -> Response {
    let product_id = ProductId::new(id);

    let flash = match state
        .api()
        .moderate_product(&product_id, decision, token)
        .await
    {
        Ok(()) => {
            let message = match decision {
                Decision::Approve => "Approved deal",
                Decision::Reject => "Rejected deal",
            };
            add_breadcrumb("moderation", message, Some(&[("product_id", product_id.as_str())]));
            decided_flash(decision)
        }
        Err(e) if e.is_unauthorized() => return expire_session(session, "/admin").await,
        Err(e) => {
            tracing::warn!(error = %e, ?decision, "Moderation failed");
            Flash::error(e.user_message(failure_fallback(decision)))
        }
    };

    push_flash(session, flash).await;
    Redirect::to("/admin").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::FlashKind;

    #[test]
    fn test_row_fallbacks() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p9",
            "title": "Blender",
            "description": "Short",
            "salePrice": 20,
            "listPrice": 45.5,
            "createdAt": "2025-03-14T21:05:09Z",
        }))
        .unwrap();

        let row = PendingRow::from(&product);
        assert_eq!(row.excerpt, "Short...");
        assert_eq!(row.creator, "User Unknown");
        assert_eq!(row.deal_url, None);
        assert!(!row.has_image);
        assert_eq!(row.list_price, "$45.50");
        assert_eq!(row.created_at, "3/14/2025, 9:05:09 PM");
    }

    #[test]
    fn test_decision_messages() {
        let approved = decided_flash(Decision::Approve);
        assert_eq!(approved.kind, FlashKind::Success);
        assert_eq!(approved.message, "Product approved");

        let rejected = decided_flash(Decision::Reject);
        assert_eq!(rejected.kind, FlashKind::Error);
        assert_eq!(rejected.message, "Product rejected");

        assert_eq!(failure_fallback(Decision::Reject), "Failed to reject product");
    }

    #[test]
    fn test_row_with_creator() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p9",
            "title": "Blender",
            "salePrice": 20,
            "dealUrl": "https://shop.example/blender",
            "createdBy": {"_id": "u1", "username": "mod_fan"},
            "images": [{"url": "https://img/b.jpg"}],
        }))
        .unwrap();

        let row = PendingRow::from(&product);
        assert_eq!(row.creator, "mod_fan");
        assert_eq!(row.deal_url.as_deref(), Some("https://shop.example/blender"));
        assert_eq!(row.thumbnail, "https://img/b.jpg");
        assert_eq!(row.created_at, "Invalid Date");
    }
}
