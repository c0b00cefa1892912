//! Invoice amounts in minor currency units.
//!
//! Amounts are entered in dollars (`"50.00"`) and stored as whole cents in an
//! `INTEGER` column. Conversion goes through [`Decimal`] so `"0.29"` becomes
//! `29` and never `28.999…`.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when turning user input into [`Cents`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input is not a number.
    #[error("amount is not a number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// The amount does not fit in the database column.
    #[error("amount is too large")]
    TooLarge,
}

/// A positive amount of money in cents.
///
/// ## Constraints
///
/// - Strictly greater than zero
/// - At most `i32::MAX` cents (the `invoices.amount` column is `INTEGER`)
///
/// ## Examples
///
/// ```
/// use invoice_desk_core::Cents;
///
/// assert_eq!(Cents::from_dollars("50.00").unwrap().get(), 5000);
/// assert_eq!(Cents::from_dollars("0.005").unwrap().get(), 1);
/// assert!(Cents::from_dollars("-1").is_err());
/// assert!(Cents::from_dollars("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i32);

impl Cents {
    /// Parse a dollar amount the way a browser number field is coerced.
    ///
    /// Blank input counts as zero. Plain decimals (`"12.5"`) and scientific
    /// notation (`"1e3"`) are accepted. The result is rounded to the nearest
    /// cent, with midpoints rounded away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotANumber`] for unparsable input,
    /// [`AmountError::NotPositive`] for amounts `<= 0` and
    /// [`AmountError::TooLarge`] when the cents overflow `i32`.
    pub fn from_dollars(input: &str) -> Result<Self, AmountError> {
        let dollars = parse_decimal(input)?;
        Self::from_decimal(dollars)
    }

    /// Convert a dollar [`Decimal`] to cents.
    ///
    /// # Errors
    ///
    /// Same as [`Cents::from_dollars`], minus the parsing step.
    pub fn from_decimal(dollars: Decimal) -> Result<Self, AmountError> {
        if dollars <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        let cents = dollars
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(AmountError::TooLarge)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        // Sub-half-cent amounts round down to nothing.
        if cents.is_zero() {
            return Err(AmountError::NotPositive);
        }

        cents.to_i32().map(Self).ok_or(AmountError::TooLarge)
    }

    /// Wrap a cent value read back from the database.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] if the value is `<= 0`.
    pub const fn from_cents(cents: i32) -> Result<Self, AmountError> {
        if cents <= 0 {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(cents))
    }

    /// Get the amount in cents.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Get the amount in dollars.
    #[must_use]
    pub fn to_dollars(self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }
}

impl fmt::Display for Cents {
    /// Formats as US currency, e.g. `$1,234.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = self.0 % 100;

        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "${grouped}.{cents:02}")
    }
}

fn parse_decimal(input: &str) -> Result<Decimal, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| out_of_range(trimmed))
}

/// Classify input `Decimal` rejected: numbers it cannot represent are too
/// large or too small, anything else is not a number.
fn out_of_range(input: &str) -> AmountError {
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 => AmountError::TooLarge,
        Ok(value) if value.is_finite() => AmountError::NotPositive,
        _ => AmountError::NotANumber,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fractional_dollars() {
        assert_eq!(Cents::from_dollars("50").unwrap().get(), 5000);
        assert_eq!(Cents::from_dollars("50.00").unwrap().get(), 5000);
        assert_eq!(Cents::from_dollars("0.29").unwrap().get(), 29);
        assert_eq!(Cents::from_dollars("  12.5 ").unwrap().get(), 1250);
    }

    #[test]
    fn test_rounds_to_nearest_cent() {
        assert_eq!(Cents::from_dollars("10.004").unwrap().get(), 1000);
        assert_eq!(Cents::from_dollars("10.005").unwrap().get(), 1001);
        assert_eq!(Cents::from_dollars("10.999").unwrap().get(), 1100);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(Cents::from_dollars("1e3").unwrap().get(), 100_000);
    }

    #[test]
    fn test_non_positive_amounts() {
        for input in ["0", "0.00", "-1", "-0.01", "", "   ", "0.004"] {
            assert_eq!(
                Cents::from_dollars(input),
                Err(AmountError::NotPositive),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_not_a_number() {
        for input in ["abc", "12,50", "$5", "1.2.3"] {
            assert_eq!(
                Cents::from_dollars(input),
                Err(AmountError::NotANumber),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_too_large() {
        assert_eq!(
            Cents::from_dollars("21474836.48"),
            Err(AmountError::TooLarge)
        );
        assert_eq!(
            Cents::from_dollars("21474836.47").unwrap().get(),
            i32::MAX
        );
    }

    #[test]
    fn test_out_of_range_scientific_notation() {
        assert_eq!(Cents::from_dollars("1e30"), Err(AmountError::TooLarge));
        assert_eq!(Cents::from_dollars("1E100"), Err(AmountError::TooLarge));
        assert_eq!(Cents::from_dollars("-1e30"), Err(AmountError::NotPositive));
        assert_eq!(Cents::from_dollars("1e-40"), Err(AmountError::NotPositive));
        assert_eq!(Cents::from_dollars("inf"), Err(AmountError::NotANumber));
        assert_eq!(Cents::from_dollars("NaN"), Err(AmountError::NotANumber));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Cents::from_cents(666).unwrap().get(), 666);
        assert_eq!(Cents::from_cents(0), Err(AmountError::NotPositive));
    }

    #[test]
    fn test_to_dollars() {
        let cents = Cents::from_cents(15795).unwrap();
        assert_eq!(cents.to_dollars().to_string(), "157.95");
    }

    #[test]
    fn test_display() {
        assert_eq!(Cents::from_cents(5).unwrap().to_string(), "$0.05");
        assert_eq!(Cents::from_cents(5000).unwrap().to_string(), "$50.00");
        assert_eq!(Cents::from_cents(123_456).unwrap().to_string(), "$1,234.56");
        assert_eq!(
            Cents::from_cents(100_000_000).unwrap().to_string(),
            "$1,000,000.00"
        );
    }
}
