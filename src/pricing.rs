//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::LineItem;

/// Errors that can occur while pricing cart contents.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total did not fit in minor units (unit price in minor units, quantity).
    #[error("line total overflowed: {0} x {1}")]
    Overflow(i64, u32),

    /// A decimal amount cannot be expressed in the currency's minor units.
    #[error("amount {0} cannot be represented in {1}")]
    Unrepresentable(Decimal, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the extended price of `quantity` units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result exceeds the minor unit range.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let unit_minor = unit_price.to_minor_units();

    let minor = unit_minor
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow(unit_minor, quantity))?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Calculates the subtotal of a list of line items.
///
/// An empty list totals zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: A line total exceeded the minor unit range.
/// - [`PricingError::Money`]: Money arithmetic failed or a line was priced in another currency.
pub fn subtotal<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            Ok(acc.add(item.line_total()?)?)
        })
}

/// Returns `true` when the amount is below zero.
pub fn is_negative(money: &Money<'_, Currency>) -> bool {
    money.to_minor_units() < 0
}

/// Converts money into a decimal in major units, e.g. `1299` cents to `12.99`.
pub fn to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Converts a decimal amount in major units into money.
///
/// Amounts with more precision than the currency supports are rounded to the nearest minor unit,
/// with halves rounded away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] if the amount does not fit in minor units.
pub fn from_decimal(amount: Decimal, currency: &Currency) -> Result<Money<'_, Currency>, PricingError> {
    let unrepresentable = || PricingError::Unrepresentable(amount, currency.iso_alpha_code);

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(unrepresentable)?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(unrepresentable)?;

    Ok(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, JPY, USD};
    use testresult::TestResult;

    use crate::products::ProductSnapshot;

    use super::*;

    fn line<'a>(id: &str, minor: i64, quantity: u32, currency: &'a Currency) -> LineItem<'a> {
        LineItem::new(
            ProductSnapshot::new(id, id, Money::from_minor(minor, currency)),
            quantity,
        )
    }

    #[test]
    fn line_total_multiplies_unit_price() -> TestResult {
        let total = line_total(&Money::from_minor(12_99, USD), 2)?;

        assert_eq!(total, Money::from_minor(25_98, USD));

        Ok(())
    }

    #[test]
    fn line_total_reports_overflow() {
        let result = line_total(&Money::from_minor(i64::MAX, USD), 2);

        assert_eq!(result, Err(PricingError::Overflow(i64::MAX, 2)));
    }

    #[test]
    fn subtotal_sums_extended_prices() -> TestResult {
        let items = [line("a", 12_99, 2, USD), line("b", 8_00, 1, USD)];

        assert_eq!(subtotal(&items, USD)?, Money::from_minor(33_98, USD));

        Ok(())
    }

    #[test]
    fn subtotal_of_nothing_is_zero() -> TestResult {
        assert_eq!(subtotal(&[], GBP)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_rejects_mixed_currencies() {
        let items = [line("a", 1_00, 1, USD), line("b", 1_00, 1, GBP)];

        assert!(matches!(
            subtotal(&items, USD),
            Err(PricingError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
    }

    #[test]
    fn decimal_conversions_respect_currency_exponent() -> TestResult {
        assert_eq!(to_decimal(&Money::from_minor(33_98, USD)), Decimal::new(3398, 2));
        assert_eq!(to_decimal(&Money::from_minor(500, JPY)), Decimal::from(500));

        assert_eq!(
            from_decimal(Decimal::new(1299, 2), USD)?,
            Money::from_minor(12_99, USD)
        );
        assert_eq!(
            from_decimal(Decimal::new(12_995, 3), USD)?,
            Money::from_minor(13_00, USD)
        );

        Ok(())
    }

    #[test]
    fn from_decimal_rounds_halves_away_from_zero() -> TestResult {
        assert_eq!(
            from_decimal(Decimal::new(12_985, 3), USD)?,
            Money::from_minor(12_99, USD)
        );
        assert_eq!(
            from_decimal(Decimal::new(-12_985, 3), USD)?,
            Money::from_minor(-12_99, USD)
        );
        assert_eq!(
            from_decimal(Decimal::new(12_984, 3), USD)?,
            Money::from_minor(12_98, USD)
        );

        Ok(())
    }

    #[test]
    fn from_decimal_rejects_out_of_range_amounts() {
        let result = from_decimal(Decimal::MAX, USD);

        assert!(matches!(result, Err(PricingError::Unrepresentable(_, "USD"))));
    }
}
