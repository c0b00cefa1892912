//! Form payloads and invoice validation.
//!
//! Validation is pure: it turns raw form fields into a [`ValidInvoice`] or a
//! [`FieldErrors`] map and never touches the database. Every field is checked
//! so the form can show all problems at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use invoice_desk_core::{AmountError, Cents, InvoiceStatus};

use crate::services::invoices::InvoiceError;

/// Form field names, as posted by the invoice forms.
pub mod fields {
    pub const CUSTOMER_ID: &str = "customerId";
    pub const AMOUNT: &str = "amount";
    pub const STATUS: &str = "status";
}

const CUSTOMER_REQUIRED: &str = "Please select a customer.";
const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a number.";
const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than $0.";
const AMOUNT_TOO_LARGE: &str = "Amount is too large.";
const STATUS_REQUIRED: &str = "Please select an invoice status.";

// =============================================================================
// Raw Input
// =============================================================================

/// Raw create/update invoice form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFormInput {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Sign-in form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

// =============================================================================
// Validation Results
// =============================================================================

/// A validated invoice payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

/// Field name to ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Record a message against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field, empty when the field is valid.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether a field has at least one message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// What a form re-renders with after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub errors: FieldErrors,
    pub message: Option<String>,
}

impl FormState {
    /// A state carrying only a form-level message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.into()),
        }
    }
}

/// Which form is being validated; only affects the summary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Update,
}

impl FormAction {
    const fn verb(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a raw invoice submission.
///
/// # Errors
///
/// Returns every field error found.
pub fn validate_invoice(input: &InvoiceFormInput) -> Result<ValidInvoice, FieldErrors> {
    let mut errors = FieldErrors::default();

    let customer_id = input
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    if customer_id.is_none() {
        errors.push(fields::CUSTOMER_ID, CUSTOMER_REQUIRED);
    }

    let amount = Cents::from_dollars(input.amount.as_deref().unwrap_or_default());
    if let Err(e) = &amount {
        errors.push(fields::AMOUNT, amount_message(e));
    }

    let status = input
        .status
        .as_deref()
        .and_then(|s| s.parse::<InvoiceStatus>().ok());
    if status.is_none() {
        errors.push(fields::STATUS, STATUS_REQUIRED);
    }

    match (customer_id, amount, status) {
        (Some(customer_id), Ok(amount), Some(status)) => Ok(ValidInvoice {
            customer_id: customer_id.to_owned(),
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

const fn amount_message(error: &AmountError) -> &'static str {
    match error {
        AmountError::NotANumber => AMOUNT_NOT_A_NUMBER,
        AmountError::NotPositive => AMOUNT_NOT_POSITIVE,
        AmountError::TooLarge => AMOUNT_TOO_LARGE,
    }
}

impl InvoiceFormInput {
    /// Validate for a form that shows field errors inline.
    ///
    /// # Errors
    ///
    /// Returns a [`FormState`] with the field errors and a
    /// `"Missing Fields. Failed to … Invoice."` summary.
    pub fn safe_parse(&self, action: FormAction) -> Result<ValidInvoice, FormState> {
        validate_invoice(self).map_err(|errors| FormState {
            errors,
            message: Some(format!(
                "Missing Fields. Failed to {} Invoice.",
                action.verb()
            )),
        })
    }

    /// Validate for a caller with no form to report into.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Validation`] carrying the field errors.
    pub fn parse(&self) -> Result<ValidInvoice, InvoiceError> {
        validate_invoice(self).map_err(InvoiceError::Validation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(customer_id: Option<&str>, amount: Option<&str>, status: Option<&str>) -> InvoiceFormInput {
        InvoiceFormInput {
            customer_id: customer_id.map(String::from),
            amount: amount.map(String::from),
            status: status.map(String::from),
        }
    }

    #[test]
    fn test_valid_invoice() {
        let valid = validate_invoice(&input(Some("abc"), Some("50.00"), Some("paid"))).unwrap();
        assert_eq!(valid.customer_id, "abc");
        assert_eq!(valid.amount.get(), 5000);
        assert_eq!(valid.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_amount_rounds_to_cents() {
        let valid = validate_invoice(&input(Some("abc"), Some("19.999"), Some("pending"))).unwrap();
        assert_eq!(valid.amount.get(), 2000);
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        for amount in ["-1", "0", "0.00", "", "-0.5"] {
            let errors = validate_invoice(&input(Some("abc"), Some(amount), Some("paid"))).unwrap_err();
            assert_eq!(
                errors.get(fields::AMOUNT),
                ["Amount must be greater than $0."],
                "amount {amount:?}"
            );
            assert!(!errors.has(fields::CUSTOMER_ID));
            assert!(!errors.has(fields::STATUS));
        }
    }

    #[test]
    fn test_missing_amount_counts_as_zero() {
        let errors = validate_invoice(&input(Some("abc"), None, Some("paid"))).unwrap_err();
        assert_eq!(errors.get(fields::AMOUNT), ["Amount must be greater than $0."]);
    }

    #[test]
    fn test_non_numeric_amount() {
        let errors = validate_invoice(&input(Some("abc"), Some("ten"), Some("paid"))).unwrap_err();
        assert_eq!(errors.get(fields::AMOUNT), ["Amount must be a number."]);
    }

    #[test]
    fn test_oversized_amount() {
        let errors =
            validate_invoice(&input(Some("abc"), Some("99999999999"), Some("paid"))).unwrap_err();
        assert_eq!(errors.get(fields::AMOUNT), ["Amount is too large."]);
    }

    #[test]
    fn test_collects_every_field_error() {
        let errors = validate_invoice(&InvoiceFormInput::default()).unwrap_err();
        assert_eq!(errors.get(fields::CUSTOMER_ID), ["Please select a customer."]);
        assert_eq!(errors.get(fields::AMOUNT), ["Amount must be greater than $0."]);
        assert_eq!(errors.get(fields::STATUS), ["Please select an invoice status."]);
    }

    #[test]
    fn test_blank_customer_and_unknown_status() {
        let errors = validate_invoice(&input(Some("  "), Some("10"), Some("overdue"))).unwrap_err();
        assert!(errors.has(fields::CUSTOMER_ID));
        assert!(errors.has(fields::STATUS));
        assert!(!errors.has(fields::AMOUNT));
    }

    #[test]
    fn test_safe_parse_message_names_action() {
        let bad = input(None, Some("10"), Some("paid"));

        let state = bad.safe_parse(FormAction::Create).unwrap_err();
        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Create Invoice.")
        );
        assert!(state.errors.has(fields::CUSTOMER_ID));

        let state = bad.safe_parse(FormAction::Update).unwrap_err();
        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Update Invoice.")
        );
    }

    #[test]
    fn test_strict_parse_returns_validation_error() {
        let err = input(Some("abc"), Some("-1"), Some("paid")).parse().unwrap_err();
        match err {
            InvoiceError::Validation(errors) => {
                assert!(errors.has(fields::AMOUNT));
                assert_eq!(
                    errors.to_string(),
                    "amount: Amount must be greater than $0."
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_form_deserializes_field_names() {
        let form: InvoiceFormInput =
            serde_json::from_str(r#"{"customerId":"abc","amount":"12.5","status":"pending"}"#)
                .unwrap();
        assert_eq!(form.customer_id.as_deref(), Some("abc"));
        assert_eq!(form.amount.as_deref(), Some("12.5"));
        assert_eq!(form.status.as_deref(), Some("pending"));
    }
}
