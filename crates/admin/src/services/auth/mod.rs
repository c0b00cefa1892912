//! Authentication service.
//!
//! Sign-in goes through a [`CredentialProvider`]. The production provider
//! checks an email/password pair against argon2 hashes in the `users` table.
//! [`authenticate`] turns the provider's error kinds into the fixed messages
//! the login form shows.

mod error;

pub use error::{AuthError, SignInError};

use std::future::Future;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use invoice_desk_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::forms::LoginForm;
use crate::models::{CurrentUser, User};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Verifies an email/password pair.
pub trait CredentialProvider: Sync {
    /// Resolve the user the credentials belong to.
    fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<CurrentUser, SignInError>> + Send;
}

/// Result of a sign-in attempt the login form can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials accepted.
    SignedIn(CurrentUser),
    /// Credentials rejected, with the message to show.
    Failed(&'static str),
}

/// Run a sign-in attempt.
///
/// # Errors
///
/// Returns `SignInError::Other` for failures the provider did not classify.
/// Classified [`AuthError`]s become [`AuthOutcome::Failed`].
pub async fn authenticate<P: CredentialProvider>(
    provider: &P,
    form: &LoginForm,
) -> Result<AuthOutcome, SignInError> {
    match provider.verify(&form.email, &form.password).await {
        Ok(user) => Ok(AuthOutcome::SignedIn(user)),
        Err(SignInError::Auth(AuthError::CredentialsSignin)) => {
            Ok(AuthOutcome::Failed(INVALID_CREDENTIALS))
        }
        Err(SignInError::Auth(e)) => {
            tracing::warn!(error = %e, "Sign-in failed");
            Ok(AuthOutcome::Failed(SOMETHING_WENT_WRONG))
        }
        Err(e) => Err(e),
    }
}

// =============================================================================
// Password Provider
// =============================================================================

/// Credential provider backed by the `users` table.
pub struct PasswordProvider<'a> {
    users: UserRepository<'a>,
}

impl<'a> PasswordProvider<'a> {
    /// Create a new password provider.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }
}

impl CredentialProvider for PasswordProvider<'_> {
    async fn verify(&self, email: &str, password: &str) -> Result<CurrentUser, SignInError> {
        // Submissions that could never match a user are rejected before any lookup.
        let email = Email::parse(email).map_err(|_| AuthError::CredentialsSignin)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::CredentialsSignin.into());
        }

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::CredentialsSignin)?;

        verify_password(password, &password_hash)?;

        Ok(CurrentUser::from(&user))
    }
}

// =============================================================================
// Provisioning
// =============================================================================

/// Create a user that can sign in with `password`.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
/// `AuthError::UserAlreadyExists` for rejected input, and
/// `SignInError::Other` for database failures.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, SignInError> {
    let email = Email::parse(email).map_err(AuthError::from)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    UserRepository::new(pool)
        .create(name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists.into(),
            other => SignInError::Other(other),
        })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| {
        tracing::error!("Stored password hash is not a valid PHC string");
        AuthError::Configuration("unreadable password hash".to_string())
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::CredentialsSignin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use invoice_desk_core::UserId;

    enum Behaviour {
        Accept,
        Reject(fn() -> AuthError),
        Database,
    }

    struct FakeProvider(Behaviour);

    impl CredentialProvider for FakeProvider {
        async fn verify(&self, email: &str, _password: &str) -> Result<CurrentUser, SignInError> {
            match &self.0 {
                Behaviour::Accept => Ok(CurrentUser {
                    id: UserId::new(uuid::Uuid::nil()),
                    email: Email::parse(email).unwrap(),
                    name: "User".to_string(),
                }),
                Behaviour::Reject(make) => Err(make().into()),
                Behaviour::Database => Err(RepositoryError::Database(sqlx::Error::PoolTimedOut).into()),
            }
        }
    }

    fn form() -> LoginForm {
        LoginForm {
            email: "user@nextmail.com".to_string(),
            password: "123456".to_string(),
            callback_url: None,
        }
    }

    #[tokio::test]
    async fn test_successful_sign_in() {
        let outcome = authenticate(&FakeProvider(Behaviour::Accept), &form()).await.unwrap();
        match outcome {
            AuthOutcome::SignedIn(user) => assert_eq!(user.email.as_str(), "user@nextmail.com"),
            AuthOutcome::Failed(message) => panic!("unexpected failure: {message}"),
        }
    }

    #[tokio::test]
    async fn test_credentials_signin_message() {
        let provider = FakeProvider(Behaviour::Reject(|| AuthError::CredentialsSignin));
        let outcome = authenticate(&provider, &form()).await.unwrap();
        assert_eq!(outcome, AuthOutcome::Failed("Invalid credentials."));
    }

    #[tokio::test]
    async fn test_other_auth_errors_are_generic() {
        let kinds: [fn() -> AuthError; 3] = [
            || AuthError::AccessDenied,
            || AuthError::Configuration("missing secret".to_string()),
            || AuthError::PasswordHash,
        ];
        for kind in kinds {
            let outcome = authenticate(&FakeProvider(Behaviour::Reject(kind)), &form())
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed("Something went wrong."));
        }
    }

    #[tokio::test]
    async fn test_unclassified_errors_propagate() {
        let result = authenticate(&FakeProvider(Behaviour::Database), &form()).await;
        assert!(matches!(result, Err(SignInError::Other(_))));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::CredentialsSignin)
        ));
    }

    #[test]
    fn test_unreadable_hash_is_configuration_error() {
        assert!(matches!(
            verify_password("anything", "plaintext"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
