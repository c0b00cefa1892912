//! Sign-in user model.

use invoice_desk_core::{Email, UserId};

/// A user allowed to sign in to the panel.
///
/// The password hash is not part of this type. The repository returns it
/// next to the user only for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}
