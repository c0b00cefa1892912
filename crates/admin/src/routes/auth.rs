//! Authentication route handlers.
//!
//! Email/password sign-in against the `users` table, and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::LoginForm;
use crate::middleware::auth::{LOGIN_PATH, is_safe_callback};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::services::auth::{AuthOutcome, PasswordProvider, authenticate};
use crate::services::invoices::INVOICES_PATH;
use crate::state::AppState;

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub callback_url: String,
    pub error: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Post-login destination: the callback when it is a local path, else the
/// invoice list.
fn post_login_target(callback_url: Option<&str>) -> &str {
    callback_url
        .filter(|target| is_safe_callback(target))
        .unwrap_or(INVOICES_PATH)
}

/// Render the login page. Signed-in users go straight to the dashboard.
///
/// GET /login
#[instrument(skip(user))]
async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(post_login_target(query.callback_url.as_deref())).into_response();
    }

    LoginTemplate {
        email: String::new(),
        callback_url: query.callback_url.unwrap_or_default(),
        error: None,
    }
    .into_response()
}

/// Handle the login form.
///
/// POST /login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let provider = PasswordProvider::new(state.pool());

    match authenticate(&provider, &form).await? {
        AuthOutcome::SignedIn(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id.to_string(), Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "User signed in");

            Ok(Redirect::to(post_login_target(form.callback_url.as_deref())).into_response())
        }
        AuthOutcome::Failed(message) => {
            tracing::info!(reason = message, "Sign-in rejected");

            Ok(LoginTemplate {
                email: form.email,
                callback_url: form.callback_url.unwrap_or_default(),
                error: Some(message.to_string()),
            }
            .into_response())
        }
    }
}

/// Logout and clear session.
///
/// POST /logout
async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_login_target() {
        assert_eq!(post_login_target(None), "/dashboard/invoices");
        assert_eq!(
            post_login_target(Some("/dashboard/invoices/create")),
            "/dashboard/invoices/create"
        );
        assert_eq!(
            post_login_target(Some("https://evil.example.com")),
            "/dashboard/invoices"
        );
        assert_eq!(post_login_target(Some("")), "/dashboard/invoices");
    }

    #[test]
    fn test_login_template_shows_error() {
        let html = LoginTemplate {
            email: "user@nextmail.com".to_string(),
            callback_url: "/dashboard/invoices".to_string(),
            error: Some("Invalid credentials.".to_string()),
        }
        .render()
        .unwrap_or_default();

        assert!(html.contains("Invalid credentials."));
        assert!(html.contains("value=\"user@nextmail.com\""));
        assert!(html.contains("name=\"callbackUrl\""));
    }
}
