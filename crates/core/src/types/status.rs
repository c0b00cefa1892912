//! Invoice status.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`InvoiceStatus`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid invoice status: {0:?}")]
pub struct InvoiceStatusError(pub String);

/// Payment status of an invoice.
///
/// Stored as lowercase text in `invoices.status`, guarded by a `CHECK`
/// constraint with the same two values. Repositories bind [`as_str`] and
/// parse rows back with [`FromStr`].
///
/// [`as_str`]: InvoiceStatus::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, not yet paid.
    #[default]
    Pending,
    /// Settled.
    Paid,
}

impl InvoiceStatus {
    /// All statuses, in the order forms list them.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Paid];

    /// The stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Human label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = InvoiceStatusError;

    /// Parsing is exact: `"Paid"` and `" paid"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(InvoiceStatusError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!("pending".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Pending);
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
    }

    #[test]
    fn test_parse_is_exact() {
        for input in ["Paid", "PENDING", " paid", "", "overdue"] {
            assert!(input.parse::<InvoiceStatus>().is_err(), "input {input:?}");
        }
    }

    #[test]
    fn test_display_matches_storage() {
        for status in InvoiceStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
            assert_eq!(status.as_str().parse::<InvoiceStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }
}
