//! Invoice Desk CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! idesk migrate
//!
//! # Insert sample customers, invoices and a demo user
//! idesk seed
//!
//! # Create a user who can sign in to the panel
//! idesk user create -n "Jane Doe" -e jane@example.com -p s3cret!
//!
//! # Create an invoice (fails on any invalid field)
//! idesk invoice create -c <customer-uuid> -a 120.50 -s pending
//! ```
//!
//! # Environment Variables
//!
//! - `POSTGRES_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `POSTGRES_SSL_MODE` - Optional SSL mode (defaults to `require`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "idesk")]
#[command(author, version, about = "Invoice Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with sample customers, invoices and a demo user
    Seed,
    /// Manage panel users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage invoices
    Invoice {
        #[command(subcommand)]
        action: InvoiceAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address used to sign in
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum InvoiceAction {
    /// Create a new invoice dated today
    Create {
        /// Customer UUID
        #[arg(short, long)]
        customer_id: String,

        /// Amount in dollars, e.g. 120.50
        #[arg(short, long)]
        amount: String,

        /// Status (`pending` or `paid`)
        #[arg(short, long, default_value = "pending")]
        status: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
            } => {
                commands::user::create(&name, &email, &password).await?;
            }
        },
        Commands::Invoice { action } => match action {
            InvoiceAction::Create {
                customer_id,
                amount,
                status,
            } => {
                commands::invoice::create(customer_id, amount, status).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoice_create() {
        let cli = Cli::try_parse_from([
            "idesk", "invoice", "create", "-c", "abc", "-a", "50.00", "-s", "paid",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Invoice {
                action: InvoiceAction::Create { ref customer_id, ref amount, ref status }
            }) if customer_id == "abc" && amount == "50.00" && status == "paid"
        ));
    }

    #[test]
    fn test_user_create_requires_password() {
        assert!(Cli::try_parse_from(["idesk", "user", "create", "-n", "A", "-e", "a@b.co"]).is_err());
    }
}
