//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! idesk user create -n "Jane Doe" -e jane@example.com -p s3cret!
//! ```

use invoice_desk_admin::services::auth;

/// Create a user who can sign in to the panel.
///
/// # Errors
///
/// Returns an error for an invalid email, a short password, an email that
/// is already registered, or a database failure.
pub async fn create(name: &str, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = auth::create_user(&pool, name, email, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(())
}
