//! Seed the database with sample data.
//!
//! Inserts a fixed set of customers, a batch of invoices across them and a
//! demo user (`user@nextmail.com` / `123456`). Customers are keyed by id and
//! skipped when present; invoices are only inserted into an empty table.
//! Seeded customers have no picture, so the list shows their initial.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use invoice_desk_admin::services::auth::{self, AuthError, SignInError};

const DEMO_USER_NAME: &str = "User";
const DEMO_USER_EMAIL: &str = "user@nextmail.com";
const DEMO_USER_PASSWORD: &str = "123456";

struct SeedCustomer {
    id: &'static str,
    name: &'static str,
    email: &'static str,
}

struct SeedInvoice {
    customer: usize,
    amount: i32,
    status: &'static str,
    date: (i32, u32, u32),
}

const CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
    },
    SeedCustomer {
        id: "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
    },
    SeedCustomer {
        id: "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        name: "Lee Robinson",
        email: "lee@robinson.com",
    },
    SeedCustomer {
        id: "76d65c26-f784-44a2-ac19-586678f7c2f2",
        name: "Michael Novotny",
        email: "michael@novotny.com",
    },
    SeedCustomer {
        id: "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        name: "Amy Burns",
        email: "amy@burns.com",
    },
    SeedCustomer {
        id: "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        name: "Balazs Orban",
        email: "balazs@orban.com",
    },
];

const INVOICES: &[SeedInvoice] = &[
    SeedInvoice { customer: 0, amount: 15795, status: "pending", date: (2022, 12, 6) },
    SeedInvoice { customer: 1, amount: 20348, status: "pending", date: (2022, 11, 14) },
    SeedInvoice { customer: 4, amount: 3040, status: "paid", date: (2022, 10, 29) },
    SeedInvoice { customer: 3, amount: 44800, status: "paid", date: (2023, 9, 10) },
    SeedInvoice { customer: 5, amount: 34577, status: "pending", date: (2023, 8, 5) },
    SeedInvoice { customer: 2, amount: 54246, status: "pending", date: (2023, 7, 16) },
    SeedInvoice { customer: 0, amount: 666, status: "pending", date: (2023, 6, 27) },
    SeedInvoice { customer: 3, amount: 32545, status: "paid", date: (2023, 6, 9) },
    SeedInvoice { customer: 4, amount: 1250, status: "paid", date: (2023, 6, 17) },
    SeedInvoice { customer: 5, amount: 8546, status: "paid", date: (2023, 6, 7) },
    SeedInvoice { customer: 1, amount: 500, status: "paid", date: (2023, 8, 19) },
    SeedInvoice { customer: 5, amount: 8945, status: "paid", date: (2023, 6, 3) },
    SeedInvoice { customer: 2, amount: 1000, status: "paid", date: (2022, 6, 5) },
];

/// Insert the sample data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let customers = seed_customers(&pool).await?;
    info!(inserted = customers, "Customers seeded");

    let invoices = seed_invoices(&pool).await?;
    info!(inserted = invoices, "Invoices seeded");

    seed_user(&pool).await?;

    info!("Seeding complete!");
    Ok(())
}

async fn seed_customers(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for customer in CUSTOMERS {
        let result = sqlx::query(
            r"
            INSERT INTO customers (id, name, email)
            VALUES ($1::uuid, $2, $3)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(customer.id)
        .bind(customer.name)
        .bind(customer.email)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn seed_invoices(pool: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        info!(existing, "Invoices table not empty, skipping");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for invoice in INVOICES {
        let (year, month, day) = invoice.date;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| format!("invalid seed date {year}-{month}-{day}"))?;
        let customer = CUSTOMERS
            .get(invoice.customer)
            .ok_or_else(|| format!("unknown seed customer index {}", invoice.customer))?;

        let result = sqlx::query(
            r"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            ",
        )
        .bind(customer.id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(date)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn seed_user(pool: &PgPool) -> Result<(), SignInError> {
    match auth::create_user(pool, DEMO_USER_NAME, DEMO_USER_EMAIL, DEMO_USER_PASSWORD).await {
        Ok(user) => {
            info!(user_id = %user.id, email = DEMO_USER_EMAIL, "Demo user created");
            Ok(())
        }
        Err(SignInError::Auth(AuthError::UserAlreadyExists)) => {
            info!(email = DEMO_USER_EMAIL, "Demo user already exists, skipping");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
