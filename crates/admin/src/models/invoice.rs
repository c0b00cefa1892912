//! Invoice models.

use chrono::NaiveDate;
use serde::Serialize;

use invoice_desk_core::{Cents, CustomerId, InvoiceId, InvoiceStatus};

use crate::forms::ValidInvoice;

/// A stored invoice, as loaded for the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// One row of the invoice table, joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceListItem {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Insert parameters for a new invoice.
///
/// `customer_id` is kept as submitted; the database rejects values that are
/// not a known customer UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    /// Stamp a validated payload with its issue date.
    #[must_use]
    pub fn from_valid(valid: ValidInvoice, date: NaiveDate) -> Self {
        Self {
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
            date,
        }
    }
}

/// Update parameters. The issue date never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl From<ValidInvoice> for InvoiceChanges {
    fn from(valid: ValidInvoice) -> Self {
        Self {
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
        }
    }
}

/// Row returned by the diagnostic amount query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AmountReport {
    pub amount: i32,
    pub name: String,
}
