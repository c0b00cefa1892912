//! Authentication extractors.
//!
//! Dashboard handlers take [`RequireAuth`]; anonymous requests are sent to
//! the login page with the original path as `callbackUrl`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use url::form_urlencoded;

use crate::models::{CurrentUser, session_keys};

/// Path of the sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, remembering where the user was going.
    RedirectToLogin { callback_url: String },
    /// The session layer is missing from the router.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { callback_url } => {
                Redirect::to(&login_redirect(&callback_url)).into_response()
            }
            Self::SessionUnavailable => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::SessionUnavailable)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                callback_url: path_and_query(&parts.uri),
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the signed-in user.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// The session id is cycled so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Only same-site absolute paths are accepted as post-login targets.
///
/// Browsers drop tabs and newlines and treat `\` as `/`, so any of those
/// anywhere in the target could turn it into a protocol-relative URL.
#[must_use]
pub fn is_safe_callback(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.chars().any(|c| c == '\\' || c.is_control())
}

fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

fn login_redirect(callback_url: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(callback_url.as_bytes()).collect();
    format!("{LOGIN_PATH}?callbackUrl={encoded}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request, http::header::LOCATION, routing::get};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;

    async fn protected(RequireAuth(user): RequireAuth) -> String {
        user.name
    }

    fn app() -> Router {
        Router::new()
            .route("/dashboard/invoices", get(protected))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
    }

    #[tokio::test]
    async fn test_anonymous_request_redirects_to_login() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/dashboard/invoices?page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?callbackUrl=%2Fdashboard%2Finvoices%3Fpage%3D2"
        );
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_server_error() {
        let app = Router::new().route("/dashboard/invoices", get(protected));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard/invoices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_is_safe_callback() {
        assert!(is_safe_callback("/dashboard/invoices"));
        assert!(is_safe_callback("/dashboard/invoices?page=2"));
        assert!(!is_safe_callback("https://evil.example.com"));
        assert!(!is_safe_callback("//evil.example.com"));
        assert!(!is_safe_callback("/\\evil.example.com"));
        assert!(!is_safe_callback(""));
    }

    #[test]
    fn test_is_safe_callback_rejects_stripped_characters() {
        assert!(!is_safe_callback("/\t/evil.example.com"));
        assert!(!is_safe_callback("/\n/evil"));
        assert!(!is_safe_callback("/\r//evil.example.com"));
        assert!(!is_safe_callback("/dashboard\\..\\\\evil.example.com"));
        assert!(is_safe_callback("/dashboard/invoices?query=lee%20robinson"));
    }
}
