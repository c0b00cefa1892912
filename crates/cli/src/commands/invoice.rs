//! Invoice management commands.
//!
//! Unlike the web form, any invalid field aborts the command with every
//! field error listed.
//!
//! # Usage
//!
//! ```bash
//! idesk invoice create -c 3958dc9e-712f-4377-85e9-fec4b6a6442a -a 120.50 -s paid
//! ```

use chrono::Utc;

use invoice_desk_admin::db::InvoiceRepository;
use invoice_desk_admin::forms::InvoiceFormInput;
use invoice_desk_admin::services::invoices;

/// Build the raw input the validator expects from CLI arguments.
fn form_input(customer_id: String, amount: String, status: String) -> InvoiceFormInput {
    InvoiceFormInput {
        customer_id: Some(customer_id),
        amount: Some(amount),
        status: Some(status),
    }
}

/// Validate and insert an invoice dated today.
///
/// # Errors
///
/// Returns `InvoiceError::Validation` when a field is invalid and
/// `InvoiceError::Database` when the insert fails.
pub async fn create(
    customer_id: String,
    amount: String,
    status: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let valid = form_input(customer_id, amount, status).parse()?;

    let pool = super::connect().await?;
    let repo = InvoiceRepository::new(&pool);

    invoices::create_invoice_strict(&repo, &valid, Utc::now().date_naive()).await?;

    tracing::info!(
        customer_id = %valid.customer_id,
        amount = %valid.amount,
        status = valid.status.as_str(),
        "Invoice created"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use invoice_desk_admin::services::InvoiceError;

    use super::*;

    #[test]
    fn test_invalid_amount_is_rejected_before_connecting() {
        let result = form_input("abc".into(), "-1".into(), "paid".into()).parse();
        assert!(matches!(result, Err(InvoiceError::Validation(ref errors)) if errors.has("amount")));
    }

    #[test]
    fn test_valid_input_parses() {
        let result = form_input("abc".into(), "50.00".into(), "paid".into()).parse();
        assert!(result.is_ok());
    }
}
