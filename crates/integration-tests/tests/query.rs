//! Integration tests for the diagnostic query endpoint.
//!
//! Requires the admin server running against a seeded database.

#![allow(clippy::unwrap_used)]

use invoice_desk_integration_tests::{admin_base_url, client};
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AmountReport {
    amount: i32,
    name: String,
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_query_returns_invoices_of_six_sixty_six() {
    let resp = client()
        .unwrap()
        .get(format!("{}/query", admin_base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let rows: Vec<AmountReport> = resp.json().await.unwrap();
    assert!(rows.iter().all(|r| r.amount == 666));
    assert!(rows.iter().any(|r| r.name == "Evil Rabbit"));
}
