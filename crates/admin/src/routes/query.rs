//! Diagnostic query endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracing::instrument;

use crate::db::InvoiceRepository;
use crate::state::AppState;

/// Amount (in cents) the diagnostic query looks for.
const DIAGNOSTIC_AMOUNT: i32 = 666;

/// Build the diagnostic router.
pub fn router() -> Router<AppState> {
    Router::new().route("/query", get(query))
}

/// Invoices of exactly $6.66 with their customer names, as JSON.
///
/// GET /query
#[instrument(skip(state))]
async fn query(State(state): State<AppState>) -> Response {
    match InvoiceRepository::new(state.pool())
        .list_by_amount(DIAGNOSTIC_AMOUNT)
        .await
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Diagnostic query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            )
                .into_response()
        }
    }
}
