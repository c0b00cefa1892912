//! Domain models for the admin panel.

pub mod customer;
pub mod invoice;
pub mod session;
pub mod user;

pub use customer::CustomerField;
pub use invoice::{AmountReport, Invoice, InvoiceChanges, InvoiceListItem, NewInvoice};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
