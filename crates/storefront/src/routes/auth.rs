//! Authentication route handlers.
//!
//! Credentials are exchanged with the remote API for a bearer token, which is
//! kept in the server-side session next to the user's identity.

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

use market360_core::Email;

use crate::api::{ApiError, SignUpRequest};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, login_url, set_current_user};
use crate::models::{CurrentUser, Flash, PageContext, push_flash};
use crate::state::AppState;

/// Where a successful login lands without an explicit `next`.
const DEFAULT_LANDING: &str = "/products";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub error: Option<String>,
    pub email: String,
    pub next: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub error: Option<String>,
    pub username: String,
    pub email: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Accept a post-login destination only if it stays on this site.
#[must_use]
pub fn safe_next(next: Option<&str>) -> Option<String> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
        .map(str::to_owned)
}

/// Drop a session whose API token was rejected and send the user to log in.
pub async fn expire_session(session: &Session, next: &str) -> Response {
    if let Err(e) = clear_current_user(session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    clear_sentry_user();
    push_flash(
        session,
        Flash::info("Your session has expired. Please log in again."),
    )
    .await;
    Redirect::to(&login_url(next)).into_response()
}

/// Message shown for a failed sign-in.
fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::RateLimited(secs) => {
            format!("Too many attempts. Try again in {secs} seconds.")
        }
        ApiError::Unauthorized(_) | ApiError::NotFound(_) | ApiError::Api { status: 400..=499, .. } => {
            err.user_message("Invalid email or password")
        }
        _ => "Login failed. Please try again.".to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        page,
        error: None,
        email: String::new(),
        next: safe_next(query.next.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());

    let auth = match state.api().sign_in(form.email.trim(), &form.password).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let status = if matches!(e, ApiError::RateLimited(_)) {
                StatusCode::TOO_MANY_REQUESTS
            } else {
                StatusCode::UNAUTHORIZED
            };
            return (
                status,
                LoginTemplate {
                    page: PageContext::load(&session).await,
                    error: Some(login_error_message(&e)),
                    email: form.email,
                    next,
                },
            )
                .into_response();
        }
    };

    let (token, user) = auth.into_parts();
    let current_user = CurrentUser::new(token, user);

    if let Err(e) = set_current_user(&session, &current_user).await {
        tracing::error!("Failed to set session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            LoginTemplate {
                page: PageContext::load(&session).await,
                error: Some("Login failed. Please try again.".to_string()),
                email: form.email,
                next,
            },
        )
            .into_response();
    }

    set_sentry_user(&current_user.id, current_user.email.as_deref());
    tracing::info!(user_id = %current_user.id, "User logged in");

    Redirect::to(next.as_deref().unwrap_or(DEFAULT_LANDING)).into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        page,
        error: None,
        username: String::new(),
        email: String::new(),
    }
}

/// Checks made before the API sees a registration.
fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if form.username.trim().is_empty() {
        return Err("Username is required");
    }
    if Email::parse(form.email.trim()).is_err() {
        return Err("Please enter a valid email address");
    }
    if form.password.is_empty() {
        return Err("Password is required");
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.");
    }
    Ok(())
}

/// Re-render the registration form with an error, keeping the typed names.
async fn register_rejected(
    session: &Session,
    form: RegisterForm,
    status: StatusCode,
    error: &str,
) -> Response {
    (
        status,
        RegisterTemplate {
            page: PageContext::load(session).await,
            error: Some(error.to_owned()),
            username: form.username,
            email: form.email,
        },
    )
        .into_response()
}

/// Handle registration form submission.
///
/// A new account still has to log in; the API issues tokens only on sign-in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(message) = validate_registration(&form) {
        return register_rejected(&session, form, StatusCode::UNPROCESSABLE_ENTITY, message).await;
    }

    let request = SignUpRequest {
        email: form.email.trim().to_owned(),
        password: form.password.clone(),
        username: form.username.trim().to_owned(),
        confirm_password: form.confirm_password.clone(),
    };

    match state.api().sign_up(&request).await {
        Ok(()) => {
            tracing::info!(email = %request.email, "Account registered");
            push_flash(
                &session,
                Flash::success("Account created. Please log in."),
            )
            .await;
            Redirect::to("/auth/login").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let message = e.user_message("Registration failed. Please try again.");
            register_rejected(&session, form, StatusCode::BAD_REQUEST, &message).await
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Revokes the API token (best effort) and clears the identity from the
/// session. The session itself survives to carry the goodbye flash.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Response {
    if let Some(user) = user {
        if let Err(e) = state.api().sign_out(user.access_token()).await {
            tracing::warn!("Failed to revoke API token: {}", e);
        }
        tracing::info!(user_id = %user.id, "User logged out");
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {}", e);
    }
    clear_sentry_user();

    push_flash(&session, Flash::info("You have been logged out.")).await;
    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: "dealhunter".to_string(),
            email: "hunter@market360.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/wishlist")), Some("/wishlist".to_string()));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&form("abc", "abc")).is_ok());
        assert_eq!(
            validate_registration(&form("abc", "abd")),
            Err("Passwords do not match.")
        );

        let mut bad_email = form("abc", "abc");
        bad_email.email = "not-an-email".to_string();
        assert_eq!(
            validate_registration(&bad_email),
            Err("Please enter a valid email address")
        );
    }

    #[test]
    fn test_login_error_message() {
        assert_eq!(
            login_error_message(&ApiError::Unauthorized(None)),
            "Invalid email or password"
        );
        assert_eq!(
            login_error_message(&ApiError::Unauthorized(Some("Account locked".to_string()))),
            "Account locked"
        );
        assert_eq!(
            login_error_message(&ApiError::Api {
                status: 502,
                message: None
            }),
            "Login failed. Please try again."
        );
    }
}
