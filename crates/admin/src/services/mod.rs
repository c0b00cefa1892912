//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Credential sign-in and user provisioning
//! - `invoices` - Invoice create, update and delete actions

pub mod auth;
pub mod invoices;

pub use auth::{AuthError, AuthOutcome, CredentialProvider, PasswordProvider, SignInError};
pub use invoices::{InvoiceError, InvoiceStore};
