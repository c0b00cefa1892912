//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Failures a credential provider reports by kind.
///
/// `CredentialsSignin` is the only kind shown to the user as a credentials
/// problem; every other kind surfaces as a generic failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown email, or a malformed submission.
    #[error("invalid credentials")]
    CredentialsSignin,

    /// The user exists but may not sign in.
    #[error("access denied")]
    AccessDenied,

    /// The provider is misconfigured.
    #[error("auth configuration error: {0}")]
    Configuration(String),

    /// Invalid email format when provisioning a user.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] invoice_desk_core::EmailError),

    /// Password too short.
    #[error("password must be at least {min} characters")]
    WeakPassword {
        /// Minimum accepted length.
        min: usize,
    },

    /// A user with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Error returned by a sign-in attempt.
///
/// `Auth` failures are expected and turned into form messages. `Other`
/// covers anything the provider did not classify, such as a database outage,
/// and is propagated to the caller.
#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("sign-in failed: {0}")]
    Other(#[from] RepositoryError),
}
