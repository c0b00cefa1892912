//! Core types for Invoice Desk.
//!
//! This module provides type-safe wrappers for the invoicing domain.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{AmountError, Cents};
pub use status::{InvoiceStatus, InvoiceStatusError};
