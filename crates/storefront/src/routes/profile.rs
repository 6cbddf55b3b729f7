//! "My Profile" route handlers (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use market360_core::Gender;
use market360_core::forms::countries::COUNTRIES;
use market360_core::forms::password::PASSWORD_REQUIREMENTS;
use market360_core::forms::{FieldErrors, ProfileForm};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Flash, PageContext, push_flash};
use crate::routes::auth::expire_session;
use crate::state::AppState;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/index.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub form: ProfileForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub show_password: bool,
    pub genders: [Gender; 3],
    pub countries: &'static [&'static str],
    pub requirements: [&'static str; 5],
}

impl ProfileTemplate {
    fn new(page: PageContext, form: ProfileForm, show_password: bool) -> Self {
        Self {
            page,
            form,
            errors: FieldErrors::new(),
            error: None,
            show_password,
            genders: Gender::ALL,
            countries: COUNTRIES,
            requirements: PASSWORD_REQUIREMENTS,
        }
    }

    /// `type` attribute of the password inputs.
    #[must_use]
    pub const fn password_input_type(&self) -> &'static str {
        if self.show_password { "text" } else { "password" }
    }

    /// Whether `country` is the submitted choice.
    #[must_use]
    pub fn is_country(&self, country: &str) -> bool {
        self.form.country == country
    }
}

/// Profile page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    #[serde(default)]
    pub show_password: Option<String>,
}

impl ProfileQuery {
    fn shows_password(&self) -> bool {
        matches!(self.show_password.as_deref(), Some("1" | "true"))
    }
}

/// Display the profile form, prefilled with what the session knows.
pub async fn show(
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    let form = ProfileForm {
        email: user.email.clone().unwrap_or_default(),
        ..ProfileForm::default()
    };
    ProfileTemplate::new(page, form, query.shows_password())
}

/// Handle profile form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Response {
    let form = form.sanitized();

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            let mut template = ProfileTemplate::new(PageContext::load(&session).await, form, false);
            template.errors = errors;
            return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
        }
    };

    match state
        .api()
        .update_profile(&update, user.access_token())
        .await
    {
        Ok(()) => {
            tracing::info!("Profile updated");
            push_flash(&session, Flash::success("Profile updated")).await;
            Redirect::to("/profile").into_response()
        }
        Err(e) if e.is_unauthorized() => expire_session(&session, "/profile").await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to update profile");
            let mut template = ProfileTemplate::new(PageContext::load(&session).await, form, false);
            template.error = Some(e.user_message("Failed to update profile"));
            (StatusCode::BAD_GATEWAY, template).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_password_toggle() {
        let query = ProfileQuery {
            show_password: Some("1".to_string()),
        };
        assert!(query.shows_password());
        assert!(!ProfileQuery::default().shows_password());

        let template = ProfileTemplate::new(PageContext::default(), ProfileForm::default(), true);
        assert_eq!(template.password_input_type(), "text");
        let template = ProfileTemplate::new(PageContext::default(), ProfileForm::default(), false);
        assert_eq!(template.password_input_type(), "password");
    }

    #[test]
    fn test_profile_page_renders_requirements() {
        let html = ProfileTemplate::new(PageContext::default(), ProfileForm::default(), false)
            .render()
            .unwrap_or_default();
        assert!(html.contains("My Profile"));
        assert!(html.contains("Password Requirements:"));
        assert!(html.contains("At least 16 characters"));
        assert!(html.contains("Select Country"));
    }
}
