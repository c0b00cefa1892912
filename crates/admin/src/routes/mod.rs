//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness (in main)
//! GET  /health/ready                    - Readiness (in main)
//! GET  /                                - Redirect to the invoice list
//!
//! # Auth
//! GET  /login                           - Login page
//! POST /login                           - Email/password sign-in
//! POST /logout                          - Logout
//!
//! # Invoices (signed-in only)
//! GET  /dashboard                       - Redirect to the invoice list
//! GET  /dashboard/invoices              - List (cached), ?query=&page=
//! POST /dashboard/invoices              - Create
//! GET  /dashboard/invoices/create       - Create form
//! GET  /dashboard/invoices/{id}/edit    - Edit form
//! POST /dashboard/invoices/{id}/edit    - Update
//! POST /dashboard/invoices/{id}/delete  - Delete
//!
//! # Diagnostics
//! GET  /query                           - Invoices of $6.66 as JSON
//! ```

pub mod auth;
pub mod invoices;
pub mod query;

use axum::{Router, response::Redirect, routing::get};

use crate::services::invoices::INVOICES_PATH;
use crate::state::AppState;

/// Build the application router (without health checks or middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(INVOICES_PATH) }))
        .merge(auth::router())
        .merge(invoices::router())
        .merge(query::router())
}
