//! Customer models.

use invoice_desk_core::CustomerId;

/// Customer option for the invoice form's select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerField {
    pub id: CustomerId,
    pub name: String,
}
