//! Statutory tax withholding.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Flat statutory tax rate applied to pay after deductions.
pub const STATUTORY_TAX_RATE: Decimal = dec!(0.10);

/// Calculates the tax withheld on `gross` after `deductions`.
///
/// The taxable base is floored at zero, taxed at [`STATUTORY_TAX_RATE`] and
/// rounded to two decimal places, half to even.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_tax;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tax = calculate_tax(Decimal::new(1_000_000, 0), Decimal::ZERO);
/// assert_eq!(tax, Decimal::from_str("100000.00").unwrap());
///
/// // Deductions larger than gross pay leave nothing to tax
/// let tax = calculate_tax(Decimal::new(100, 0), Decimal::new(250, 0));
/// assert_eq!(tax, Decimal::ZERO);
/// ```
pub fn calculate_tax(gross: Decimal, deductions: Decimal) -> Decimal {
    (taxable_base(gross, deductions) * STATUTORY_TAX_RATE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Returns `max(gross - deductions, 0)`.
pub fn taxable_base(gross: Decimal, deductions: Decimal) -> Decimal {
    (gross - deductions).max(Decimal::ZERO)
}
