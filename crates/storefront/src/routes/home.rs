//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::models::PageContext;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
}

/// Display the landing page.
pub async fn home(page: PageContext) -> impl IntoResponse {
    HomeTemplate { page }
}
