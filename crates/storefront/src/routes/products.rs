//! Deal catalog route handlers.
//!
//! Listing and detail pages render straight from the API (through the
//! client's cache). Rating buttons post here; HTMX requests get the rating
//! fragment back, plain form posts are redirected.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use market360_core::forms::{DealForm, FieldErrors};
use market360_core::{CATEGORIES, Product, ProductFilter, ProductId, RatingAction};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth, login_url};
use crate::models::{CurrentUser, Flash, PageContext, push_flash};
use crate::routes::assets::PLACEHOLDER_PATH;
use crate::routes::auth::{expire_session, safe_next};
use crate::state::AppState;

/// Characters of description shown on compact cards.
pub const EXCERPT_CHARS: usize = 100;

// =============================================================================
// View Types
// =============================================================================

/// Like/dislike counters and the viewer's own vote.
#[derive(Debug, Clone)]
pub struct RatingView {
    pub product_id: String,
    pub likes: usize,
    pub dislikes: usize,
    pub liked: bool,
    pub disliked: bool,
}

impl RatingView {
    #[must_use]
    pub fn new(product: &Product, viewer: Option<&CurrentUser>) -> Self {
        Self {
            product_id: product.id.to_string(),
            likes: product.likes.len(),
            dislikes: product.dislikes.len(),
            liked: viewer.is_some_and(|u| product.is_liked_by(&u.id)),
            disliked: viewer.is_some_and(|u| product.is_disliked_by(&u.id)),
        }
    }
}

/// A deal as shown in the catalog grid.
#[derive(Debug, Clone)]
pub struct DealCard {
    pub id: String,
    pub title: String,
    pub image: String,
    pub sale_price: String,
    pub list_price: Option<String>,
    pub discount: Option<u32>,
    pub store: Option<String>,
    pub deal_url: Option<String>,
    pub rating: RatingView,
}

impl DealCard {
    #[must_use]
    pub fn new(product: &Product, viewer: Option<&CurrentUser>) -> Self {
        let discount = product.discount_percent();
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            image: product
                .primary_image()
                .unwrap_or(PLACEHOLDER_PATH)
                .to_owned(),
            sale_price: product.sale_price.display(),
            list_price: product
                .list_price
                .is_positive()
                .then(|| product.list_price.display()),
            discount: (discount > 0).then_some(discount),
            store: product.store.clone(),
            deal_url: product.deal_link().map(str::to_owned),
            rating: RatingView::new(product, viewer),
        }
    }
}

/// A gallery thumbnail on the detail page.
#[derive(Debug, Clone)]
pub struct GalleryThumb {
    pub index: usize,
    pub url: String,
    pub active: bool,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct DealDetail {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    /// Only populated when there is more than one photo.
    pub gallery: Vec<GalleryThumb>,
    pub sale_price: String,
    pub list_price: Option<String>,
    pub discount: Option<u32>,
    pub store: String,
    pub category: String,
    pub deal_url: Option<String>,
    pub get_deal_label: String,
    pub description: Option<String>,
    pub rating: RatingView,
}

impl DealDetail {
    #[must_use]
    pub fn new(product: &Product, selected: usize, viewer: Option<&CurrentUser>) -> Self {
        let selected = if selected < product.images.len() { selected } else { 0 };
        let gallery = if product.images.len() > 1 {
            product
                .images
                .iter()
                .enumerate()
                .map(|(index, img)| GalleryThumb {
                    index,
                    url: img.url.clone(),
                    active: index == selected,
                })
                .collect()
        } else {
            Vec::new()
        };
        let discount = product.discount_percent();
        let store = product.store.clone().filter(|s| !s.is_empty());

        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            image: product.image_at(selected).map(|img| img.url.clone()),
            gallery,
            sale_price: product.sale_price.display(),
            list_price: product
                .list_price
                .is_positive()
                .then(|| product.list_price.display()),
            discount: (discount > 0).then_some(discount),
            get_deal_label: format!("Get Deal at {}", store.as_deref().unwrap_or_default())
                .trim_end()
                .to_owned(),
            store: store.unwrap_or_else(|| "N/A".to_owned()),
            category: product
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "N/A".to_owned()),
            deal_url: product.deal_link().map(str::to_owned),
            description: Some(product.description.clone()).filter(|d| !d.trim().is_empty()),
            rating: RatingView::new(product, viewer),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub deals: Vec<DealCard>,
    pub filter: ProductFilter,
    pub categories: &'static [&'static str],
    pub error: Option<String>,
}

/// Deal detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub deal: DealDetail,
}

/// Missing deal page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

/// Deal submission form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct NewDealTemplate {
    pub page: PageContext,
    pub form: DealForm,
    pub errors: FieldErrors,
    pub categories: &'static [&'static str],
    pub error: Option<String>,
}

/// Rating buttons fragment (HTMX swap target).
#[derive(Template, WebTemplate)]
#[template(path = "partials/rating.html")]
pub struct RatingFragmentTemplate {
    pub rating: RatingView,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Detail page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    /// Selected gallery photo, kept raw so a bad value falls back to the
    /// first photo instead of rejecting the request.
    pub image: Option<String>,
}

impl ShowQuery {
    /// Index of the selected photo; anything unparsable selects the first.
    #[must_use]
    pub fn selected_image(&self) -> usize {
        self.image
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Where to send the browser after a non-HTMX rating post.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    pub next: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Display the catalog grid.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let filter = ProductFilter::from_query(query.as_deref().unwrap_or_default());

    let (deals, error) = match state.api().list_products(None, None).await {
        Ok(products) => {
            let viewer = page.user.as_ref();
            let deals = filter
                .apply(products)
                .iter()
                .map(|p| DealCard::new(p, viewer))
                .collect();
            (deals, None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            (Vec::new(), Some(e.user_message("Failed to load products")))
        }
    };

    ProductsIndexTemplate {
        page,
        deals,
        filter,
        categories: &CATEGORIES,
        error,
    }
}

/// Display a deal.
///
/// # Errors
///
/// Returns an error if the API fails for any reason other than a missing deal.
#[instrument(skip(state, page), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Result<Response> {
    let product = match state.api().get_product(&ProductId::new(id)).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { page }).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let deal = DealDetail::new(&product, query.selected_image(), page.user.as_ref());
    Ok(ProductShowTemplate { page, deal }.into_response())
}

// =============================================================================
// Deal Submission
// =============================================================================

/// Display the "Add New Deal" form.
pub async fn new(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    NewDealTemplate {
        page,
        form: DealForm::default(),
        errors: FieldErrors::new(),
        categories: &CATEGORIES,
        error: None,
    }
}

/// Handle deal submission.
///
/// Invalid input re-renders the form with field errors; an accepted deal
/// goes to moderation and the user lands back on the catalog.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<DealForm>,
) -> Response {
    let deal = match form.validate() {
        Ok(deal) => deal,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                NewDealTemplate {
                    page: PageContext::load(&session).await,
                    form,
                    errors,
                    categories: &CATEGORIES,
                    error: None,
                },
            )
                .into_response();
        }
    };

    match state.api().create_product(&deal, user.access_token()).await {
        Ok(()) => {
            add_breadcrumb("deals", "Submitted deal", Some(&[("title", deal.title.as_str())]));
            push_flash(&session, Flash::success("Deal submitted for review")).await;
            Redirect::to("/products").into_response()
        }
        Err(e) if e.is_unauthorized() => expire_session(&session, "/products/new").await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create product");
            (
                StatusCode::BAD_GATEWAY,
                NewDealTemplate {
                    page: PageContext::load(&session).await,
                    form,
                    errors: FieldErrors::new(),
                    categories: &CATEGORIES,
                    error: Some(e.user_message("Failed to create product")),
                },
            )
                .into_response()
        }
    }
}

// =============================================================================
// Ratings
// =============================================================================

/// Toggle a like.
pub async fn like(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(back): Form<ReturnTo>,
) -> Result<Response> {
    rate(&state, &session, user, &headers, id, back, RatingAction::Like).await
}

/// Toggle a dislike.
pub async fn dislike(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(back): Form<ReturnTo>,
) -> Result<Response> {
    rate(&state, &session, user, &headers, id, back, RatingAction::Dislike).await
}

/// Whether the request came from HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Apply a rating locally, forward it, and answer with the result.
///
/// The optimistic view is rendered if the API call fails; the next fetch
/// shows the API's state either way.
#[instrument(skip(state, session, user, headers, back), fields(product_id = %id, action = %action))]
async fn rate(
    state: &AppState,
    session: &Session,
    user: Option<CurrentUser>,
    headers: &HeaderMap,
    id: String,
    back: ReturnTo,
    action: RatingAction,
) -> Result<Response> {
    let next = safe_next(back.next.as_deref()).unwrap_or_else(|| format!("/products/{id}"));

    let Some(user) = user else {
        let message = match action {
            RatingAction::Like => "Please login to like products",
            RatingAction::Dislike => "Please login to dislike products",
        };
        push_flash(session, Flash::error(message)).await;

        let login = login_url(&next);
        if is_htmx(headers) {
            return Ok((StatusCode::OK, [("hx-redirect", login)]).into_response());
        }
        return Ok(Redirect::to(&login).into_response());
    };

    let product_id = ProductId::new(id);
    let mut product = state.api().get_product(&product_id).await.map_err(|e| {
        if e.is_not_found() {
            AppError::NotFound(format!("Deal {product_id}"))
        } else {
            e.into()
        }
    })?;
    product.apply_rating(action, &user.id);

    match state
        .api()
        .rate_product(&product_id, action, &user.id, user.access_token())
        .await
    {
        Ok(updated) => product = updated,
        Err(e) if e.is_unauthorized() => return Ok(expire_session(session, &next).await),
        Err(e) => tracing::warn!(error = %e, "Rating not recorded, showing optimistic state"),
    }

    if is_htmx(headers) {
        return Ok(RatingFragmentTemplate {
            rating: RatingView::new(&product, Some(&user)),
        }
        .into_response());
    }
    Ok(Redirect::to(&next).into_response())
}
