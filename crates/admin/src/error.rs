//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{InvoiceError, SignInError};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Invoice action failed.
    #[error("Invoice error: {0}")]
    Invoice(#[from] InvoiceError),

    /// Sign-in failed for a reason the provider did not classify.
    #[error("Sign-in error: {0}")]
    SignIn(#[from] SignInError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Admin request error"
        );

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Set the Sentry user context for the signed-in user.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::services::InvoiceError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Internal("template render error".to_string());
        assert_eq!(err.to_string(), "Internal error: template render error");

        let err = AppError::Database(RepositoryError::Conflict("users_email_key".to_string()));
        assert_eq!(
            err.to_string(),
            "Database error: constraint violation: users_email_key"
        );
    }

    #[test]
    fn test_app_error_hides_details() {
        let response = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::SignIn(SignInError::Other(RepositoryError::DataCorruption(
            "bad row".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invoice_error_converts() {
        let err: AppError = InvoiceError::Database {
            action: "delete",
            source: RepositoryError::Conflict("fk".to_string()),
        }
        .into();
        assert!(matches!(err, AppError::Invoice(_)));
    }
}
