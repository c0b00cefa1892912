//! Integration tests for Invoice Desk.
//!
//! The tests talk to a running admin server over HTTP and are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p invoice-desk-cli -- migrate
//! cargo run -p invoice-desk-cli -- seed
//!
//! # Start the server, then run the ignored tests
//! cargo run -p invoice-desk-admin
//! cargo test -p invoice-desk-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_BASE_URL` - Server under test (defaults to `http://localhost:3000`)
//! - `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD` - Credentials of a seeded user

use reqwest::{Client, redirect};

/// Default credentials created by `idesk seed`.
const DEFAULT_TEST_EMAIL: &str = "user@nextmail.com";
const DEFAULT_TEST_PASSWORD: &str = "123456";

/// Base URL for the admin server (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Credentials for signing in during tests.
#[must_use]
pub fn test_credentials() -> (String, String) {
    (
        std::env::var("ADMIN_TEST_EMAIL").unwrap_or_else(|_| DEFAULT_TEST_EMAIL.to_string()),
        std::env::var("ADMIN_TEST_PASSWORD").unwrap_or_else(|_| DEFAULT_TEST_PASSWORD.to_string()),
    )
}

/// HTTP client with a cookie store that does not follow redirects, so
/// tests can assert on `Location` headers.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
}

/// Client holding a signed-in session.
///
/// # Errors
///
/// Returns an error if the request fails or the server does not redirect
/// after sign-in.
pub async fn signed_in_client() -> Result<Client, Box<dyn std::error::Error>> {
    let client = client()?;
    let (email, password) = test_credentials();

    let resp = client
        .post(format!("{}/login", admin_base_url()))
        .form(&[
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("callbackUrl", ""),
        ])
        .send()
        .await?;

    if !resp.status().is_redirection() {
        return Err(format!("sign-in failed with status {}", resp.status()).into());
    }

    Ok(client)
}
