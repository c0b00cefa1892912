//! Customer repository (read-only).

use sqlx::PgPool;

use invoice_desk_core::CustomerId;

use super::RepositoryError;
use crate::models::CustomerField;

#[derive(Debug, sqlx::FromRow)]
struct CustomerFieldRow {
    id: CustomerId,
    name: String,
}

impl From<CustomerFieldRow> for CustomerField {
    fn from(row: CustomerFieldRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Repository for customer lookups.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All customers ordered by name, for the invoice form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CustomerField>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerFieldRow>(
            "SELECT id, name FROM customers ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
