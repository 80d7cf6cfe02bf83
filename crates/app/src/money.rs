//! Minor-unit money helpers

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a non-negative amount with at most two decimal places")]
pub struct AmountParseError(String);

/// Parse a major-unit amount (`40`, `12.5`, `12.05`) into minor units.
///
/// # Errors
///
/// Returns [`AmountParseError`] for negative values, more than two decimal places, or input
/// that is not a number.
pub fn parse_amount(input: &str) -> Result<u64, AmountParseError> {
    let error = || AmountParseError(input.to_string());

    let amount = Decimal::from_str(input.trim()).map_err(|_| error())?;

    if amount.is_sign_negative() || amount.normalize().scale() > 2 {
        return Err(error());
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_u64())
        .ok_or_else(error)
}

/// Render minor units as a major-unit amount, dropping a zero fraction (`40_00` → `40`,
/// `12_50` → `12.50`).
#[must_use]
pub fn format_amount(minor: u64) -> String {
    let major = minor / 100;
    let fraction = minor % 100;

    if fraction == 0 {
        major.to_string()
    } else {
        format!("{major}.{fraction:02}")
    }
}

/// [`format_amount`] with the taka suffix used on receipts and discount labels.
#[must_use]
pub fn format_taka(minor: u64) -> String {
    format!("{} TK", format_amount(minor))
}

/// Minor units as a fixed two-decimal string (`560_00` → `560.00`), the form payment gateways
/// expect.
#[must_use]
pub fn format_decimal(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
