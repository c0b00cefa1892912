//! Invoice actions.
//!
//! Each action validates its input, issues exactly one statement through an
//! [`InvoiceStore`], then revalidates the cached invoice list. Nothing is
//! retried and nothing runs in a transaction.

use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;

use invoice_desk_core::InvoiceId;

use crate::cache::PageCache;
use crate::db::RepositoryError;
use crate::forms::{FieldErrors, FormAction, FormState, InvoiceFormInput, ValidInvoice};
use crate::models::{InvoiceChanges, NewInvoice};

/// Path of the invoice list page, revalidated after every mutation.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";

/// Write side of invoice storage.
///
/// Update and delete succeed when no row matches the id.
pub trait InvoiceStore: Sync {
    fn insert(&self, invoice: &NewInvoice)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update(
        &self,
        id: InvoiceId,
        changes: &InvoiceChanges,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn delete(&self, id: InvoiceId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Errors from invoice actions that have no form to report into.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The submission failed validation.
    #[error("invalid invoice: {0}")]
    Validation(FieldErrors),

    /// The statement failed.
    #[error("Failed to {action} invoice.")]
    Database {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },
}

/// Create an invoice from a form submission, dated `today`.
///
/// # Errors
///
/// Returns the [`FormState`] to re-render the form with: field errors when
/// validation fails (no statement is issued), or a database message.
pub async fn create_invoice<S: InvoiceStore>(
    store: &S,
    cache: &PageCache,
    input: &InvoiceFormInput,
    today: NaiveDate,
) -> Result<(), FormState> {
    let valid = input.safe_parse(FormAction::Create)?;
    let invoice = NewInvoice::from_valid(valid, today);

    if let Err(e) = store.insert(&invoice).await {
        tracing::error!(error = %e, customer_id = %invoice.customer_id, "Failed to create invoice");
        return Err(FormState::with_message(CREATE_FAILED));
    }

    tracing::info!(
        customer_id = %invoice.customer_id,
        amount = invoice.amount.get(),
        status = %invoice.status,
        "Invoice created"
    );
    cache.revalidate_path(INVOICES_PATH);
    Ok(())
}

/// Update an invoice from a form submission.
///
/// The issue date is left untouched. An id with no matching row is a no-op.
///
/// # Errors
///
/// Same as [`create_invoice`], with the update message.
pub async fn update_invoice<S: InvoiceStore>(
    store: &S,
    cache: &PageCache,
    id: InvoiceId,
    input: &InvoiceFormInput,
) -> Result<(), FormState> {
    let changes = InvoiceChanges::from(input.safe_parse(FormAction::Update)?);

    if let Err(e) = store.update(id, &changes).await {
        tracing::error!(error = %e, invoice_id = %id, "Failed to update invoice");
        return Err(FormState::with_message(UPDATE_FAILED));
    }

    tracing::info!(invoice_id = %id, "Invoice updated");
    cache.revalidate_path(INVOICES_PATH);
    Ok(())
}

/// Delete an invoice. An id with no matching row is a no-op.
///
/// # Errors
///
/// Returns `InvoiceError::Database` if the statement fails.
pub async fn delete_invoice<S: InvoiceStore>(
    store: &S,
    cache: &PageCache,
    id: InvoiceId,
) -> Result<(), InvoiceError> {
    store.delete(id).await.map_err(|source| {
        tracing::error!(error = %source, invoice_id = %id, "Failed to delete invoice");
        InvoiceError::Database {
            action: "delete",
            source,
        }
    })?;

    tracing::info!(invoice_id = %id, "Invoice deleted");
    cache.revalidate_path(INVOICES_PATH);
    Ok(())
}

/// Create an already-validated invoice without touching any page cache.
///
/// Used by callers outside the web server, which keep no cache.
///
/// # Errors
///
/// Returns `InvoiceError::Database` if the statement fails.
pub async fn create_invoice_strict<S: InvoiceStore>(
    store: &S,
    valid: &ValidInvoice,
    today: NaiveDate,
) -> Result<(), InvoiceError> {
    let invoice = NewInvoice::from_valid(valid.clone(), today);

    store.insert(&invoice).await.map_err(|source| {
        tracing::error!(error = %source, customer_id = %invoice.customer_id, "Failed to create invoice");
        InvoiceError::Database {
            action: "create",
            source,
        }
    })
}
