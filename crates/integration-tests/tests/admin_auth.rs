//! Integration tests for sign-in and route protection.
//!
//! These tests require:
//! - A migrated and seeded `PostgreSQL` database
//! - The admin server running (cargo run -p invoice-desk-admin)

#![allow(clippy::unwrap_used)]

use invoice_desk_integration_tests::{admin_base_url, client, signed_in_client, test_credentials};
use reqwest::{StatusCode, header};

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_health() {
    let resp = client()
        .unwrap()
        .get(format!("{}/health", admin_base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_anonymous_dashboard_redirects_to_login() {
    let resp = client()
        .unwrap()
        .get(format!("{}/dashboard/invoices", admin_base_url()))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/login?callbackUrl="));
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_with_wrong_password_shows_error() {
    let (email, _) = test_credentials();

    let resp = client()
        .unwrap()
        .post(format!("{}/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", "definitely-wrong")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Invalid credentials."));
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_then_logout() {
    let client = signed_in_client().await.unwrap();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/dashboard/invoices"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.post(format!("{base_url}/logout")).send().await.unwrap();
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{base_url}/dashboard/invoices"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_ignores_external_callback() {
    let (email, password) = test_credentials();

    let resp = client()
        .unwrap()
        .post(format!("{}/login", admin_base_url()))
        .form(&[
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("callbackUrl", "https://evil.example.com/"),
        ])
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[header::LOCATION], "/dashboard/invoices");
}
