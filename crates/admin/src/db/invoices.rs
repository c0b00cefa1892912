//! Invoice repository.
//!
//! Every mutation is a single parameterized statement. Update and delete do
//! not check that the row exists; a missing id simply affects zero rows.

use chrono::NaiveDate;
use sqlx::PgPool;

use invoice_desk_core::{Cents, CustomerId, InvoiceId, InvoiceStatus};

use super::RepositoryError;
use crate::models::{AmountReport, Invoice, InvoiceChanges, InvoiceListItem, NewInvoice};
use crate::services::invoices::InvoiceStore;

/// Rows shown per page of the invoice table.
pub const ITEMS_PER_PAGE: u32 = 6;

const FILTER_CLAUSE: &str = r"
    FROM invoices
    JOIN customers ON invoices.customer_id = customers.id
    WHERE customers.name ILIKE $1
       OR customers.email ILIKE $1
       OR invoices.amount::text ILIKE $1
       OR invoices.date::text ILIKE $1
       OR invoices.status ILIKE $1
";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: InvoiceId,
    customer_id: CustomerId,
    amount: i32,
    status: String,
    date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = RepositoryError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            amount: decode_amount(row.amount)?,
            status: decode_status(&row.status)?,
            date: row.date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceListRow {
    id: InvoiceId,
    name: String,
    email: String,
    image_url: String,
    amount: i32,
    status: String,
    date: NaiveDate,
}

impl TryFrom<InvoiceListRow> for InvoiceListItem {
    type Error = RepositoryError;

    fn try_from(row: InvoiceListRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            amount: decode_amount(row.amount)?,
            status: decode_status(&row.status)?,
            date: row.date,
        })
    }
}

fn decode_amount(amount: i32) -> Result<Cents, RepositoryError> {
    Cents::from_cents(amount).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid amount {amount} in database: {e}"))
    })
}

fn decode_status(status: &str) -> Result<InvoiceStatus, RepositoryError> {
    status
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("{e} in database")))
}

fn search_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
pub struct InvoiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepository<'a> {
    /// Create a new invoice repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of invoices matching `query`, newest first.
    ///
    /// `page` is 1-based; values below 1 are treated as the first page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list_filtered(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<InvoiceListItem>, RepositoryError> {
        let offset = i64::from(page.max(1) - 1) * i64::from(ITEMS_PER_PAGE);
        let sql = format!(
            r"
            SELECT invoices.id, customers.name, customers.email, customers.image_url,
                   invoices.amount, invoices.status, invoices.date
            {FILTER_CLAUSE}
            ORDER BY invoices.date DESC
            LIMIT $2 OFFSET $3
            "
        );

        let rows = sqlx::query_as::<_, InvoiceListRow>(&sql)
            .bind(search_pattern(query))
            .bind(i64::from(ITEMS_PER_PAGE))
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Number of pages needed to show every invoice matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_pages(&self, query: &str) -> Result<u32, RepositoryError> {
        let sql = format!("SELECT COUNT(*) {FILTER_CLAUSE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(search_pattern(query))
            .fetch_one(self.pool)
            .await?;

        Ok(total_pages(count))
    }

    /// Get an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Invoices with exactly `amount` cents, with their customer's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_amount(&self, amount: i32) -> Result<Vec<AmountReport>, RepositoryError> {
        let rows = sqlx::query_as::<_, AmountReport>(
            r"
            SELECT invoices.amount, customers.name
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE invoices.amount = $1
            ",
        )
        .bind(amount)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

impl InvoiceStore for InvoiceRepository<'_> {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            ",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount.get())
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: InvoiceId, changes: &InvoiceChanges) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4
            ",
        )
        .bind(&changes.customer_id)
        .bind(changes.amount.get())
        .bind(changes.status.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(invoice_id = %id, "Update matched no invoice");
        }

        Ok(())
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(invoice_id = %id, "Delete matched no invoice");
        }

        Ok(())
    }
}

fn total_pages(count: i64) -> u32 {
    let count = u64::try_from(count).unwrap_or(0);
    let pages = count.div_ceil(u64::from(ITEMS_PER_PAGE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
