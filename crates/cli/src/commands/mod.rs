//! CLI command implementations.

pub mod invoice;
pub mod migrate;
pub mod seed;
pub mod user;

use invoice_desk_admin::config::DatabaseConfig;
use invoice_desk_admin::db;
use sqlx::PgPool;

/// Load the database settings from the environment and open a pool.
///
/// # Errors
///
/// Returns an error if the connection string is missing or unreachable.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database = DatabaseConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database).await?;
    Ok(pool)
}
