//! Shipping

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::pricing::{self, PricingError};

/// Subtotal, in minor units, at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD_MINOR: i64 = 50_00;

/// Errors related to shipping policy construction.
#[derive(Debug, Error, PartialEq)]
pub enum ShippingError {
    /// The threshold and flat rate use different currencies (threshold currency, rate currency).
    #[error("Free shipping threshold is in {0}, but flat rate is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A policy amount was below zero.
    #[error("Shipping amounts cannot be negative: {0}")]
    NegativeAmount(String),
}

/// Shipping charges for an order, waived once the subtotal reaches a threshold.
///
/// The flat rate is supplied by whoever owns shipping prices; the storefront itself only ever
/// shows progress towards the threshold, so the standard policy charges nothing below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShippingPolicy<'a> {
    free_shipping_threshold: Money<'a, Currency>,
    flat_rate: Money<'a, Currency>,
}

impl<'a> ShippingPolicy<'a> {
    /// Create a shipping policy.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::CurrencyMismatch`]: The amounts use different currencies.
    /// - [`ShippingError::NegativeAmount`]: Either amount is below zero.
    pub fn new(
        free_shipping_threshold: Money<'a, Currency>,
        flat_rate: Money<'a, Currency>,
    ) -> Result<Self, ShippingError> {
        let threshold_currency = free_shipping_threshold.currency();
        let rate_currency = flat_rate.currency();

        if threshold_currency != rate_currency {
            return Err(ShippingError::CurrencyMismatch(
                threshold_currency.iso_alpha_code,
                rate_currency.iso_alpha_code,
            ));
        }

        for amount in [&free_shipping_threshold, &flat_rate] {
            if pricing::is_negative(amount) {
                return Err(ShippingError::NegativeAmount(amount.to_string()));
            }
        }

        Ok(Self {
            free_shipping_threshold,
            flat_rate,
        })
    }

    /// The standard policy: free shipping from 50.00, no charge below it.
    pub fn standard(currency: &'a Currency) -> Self {
        Self {
            free_shipping_threshold: Money::from_minor(FREE_SHIPPING_THRESHOLD_MINOR, currency),
            flat_rate: Money::from_minor(0, currency),
        }
    }

    /// Subtotal at or above which shipping is free.
    pub fn free_shipping_threshold(&self) -> &Money<'a, Currency> {
        &self.free_shipping_threshold
    }

    /// Charge applied below the threshold.
    pub fn flat_rate(&self) -> &Money<'a, Currency> {
        &self.flat_rate
    }

    /// Check whether a subtotal reaches the free shipping threshold.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Money`] if the subtotal is in another currency.
    pub fn qualifies_for_free_shipping(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<bool, PricingError> {
        self.check_currency(subtotal)?;

        Ok(subtotal.to_minor_units() >= self.free_shipping_threshold.to_minor_units())
    }

    /// Shipping charge for a subtotal: zero at or above the threshold, the flat rate below it.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Money`] if the subtotal is in another currency.
    pub fn shipping_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        if self.qualifies_for_free_shipping(subtotal)? {
            Ok(Money::from_minor(0, self.free_shipping_threshold.currency()))
        } else {
            Ok(self.flat_rate)
        }
    }

    /// Amount still needed to reach free shipping, never below zero.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Money`] if the subtotal is in another currency.
    pub fn remaining_for_free_shipping(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        self.check_currency(subtotal)?;

        let remaining = self
            .free_shipping_threshold
            .to_minor_units()
            .saturating_sub(subtotal.to_minor_units())
            .max(0);

        Ok(Money::from_minor(
            remaining,
            self.free_shipping_threshold.currency(),
        ))
    }

    /// Progress towards free shipping as a whole percentage, capped at 100.
    ///
    /// Halves round up, so a subtotal of 33.98 against 50.00 reports 68. A zero threshold is
    /// always fully reached.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Money`] if the subtotal is in another currency.
    pub fn progress_percent(&self, subtotal: &Money<'a, Currency>) -> Result<u8, PricingError> {
        self.check_currency(subtotal)?;

        let threshold = self.free_shipping_threshold.to_minor_units();

        if threshold <= 0 {
            return Ok(100);
        }

        let percent = Decimal::from(subtotal.to_minor_units().max(0))
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(Decimal::from(threshold)))
            .map_or(Decimal::ONE_HUNDRED, |ratio| {
                ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            })
            .min(Decimal::ONE_HUNDRED);

        Ok(percent.to_u8().unwrap_or(100))
    }

    fn check_currency(&self, subtotal: &Money<'a, Currency>) -> Result<(), PricingError> {
        let expected = self.free_shipping_threshold.currency();
        let actual = subtotal.currency();

        if expected == actual {
            Ok(())
        } else {
            Err(PricingError::Money(MoneyError::CurrencyMismatch {
                expected: expected.iso_alpha_code,
                actual: actual.iso_alpha_code,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use super::*;

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    #[test]
    fn standard_policy_uses_fifty_threshold() {
        let policy = ShippingPolicy::standard(USD);

        assert_eq!(policy.free_shipping_threshold(), &usd(50_00));
        assert_eq!(policy.flat_rate(), &usd(0));
    }

    #[test]
    fn new_rejects_mismatched_currencies() {
        let result = ShippingPolicy::new(usd(50_00), Money::from_minor(5_00, EUR));

        assert_eq!(result, Err(ShippingError::CurrencyMismatch("USD", "EUR")));
    }

    #[test]
    fn new_rejects_negative_amounts() {
        let result = ShippingPolicy::new(usd(50_00), usd(-1));

        assert!(matches!(result, Err(ShippingError::NegativeAmount(_))));
    }

    #[test]
    fn shipping_is_free_at_threshold() -> TestResult {
        let policy = ShippingPolicy::new(usd(50_00), usd(5_99))?;

        assert_eq!(policy.shipping_for(&usd(50_00))?, usd(0));
        assert_eq!(policy.shipping_for(&usd(72_10))?, usd(0));
        assert_eq!(policy.shipping_for(&usd(49_99))?, usd(5_99));

        Ok(())
    }

    #[test]
    fn shipping_rejects_other_currency_subtotal() {
        let policy = ShippingPolicy::standard(USD);

        let result = policy.shipping_for(&Money::from_minor(10_00, EUR));

        assert_eq!(
            result,
            Err(PricingError::Money(MoneyError::CurrencyMismatch {
                expected: "USD",
                actual: "EUR",
            }))
        );
    }

    #[test]
    fn progress_percent_rounds_and_caps() -> TestResult {
        let policy = ShippingPolicy::standard(USD);

        assert_eq!(policy.progress_percent(&usd(33_98))?, 68);
        assert_eq!(policy.progress_percent(&usd(0))?, 0);
        assert_eq!(policy.progress_percent(&usd(25))?, 1);
        assert_eq!(policy.progress_percent(&usd(24))?, 0);
        assert_eq!(policy.progress_percent(&usd(50_00))?, 100);
        assert_eq!(policy.progress_percent(&usd(120_00))?, 100);

        Ok(())
    }

    #[test]
    fn progress_percent_with_zero_threshold_is_complete() -> TestResult {
        let policy = ShippingPolicy::new(usd(0), usd(0))?;

        assert_eq!(policy.progress_percent(&usd(0))?, 100);

        Ok(())
    }

    #[test]
    fn remaining_for_free_shipping_never_negative() -> TestResult {
        let policy = ShippingPolicy::standard(USD);

        assert_eq!(policy.remaining_for_free_shipping(&usd(33_98))?, usd(16_02));
        assert_eq!(policy.remaining_for_free_shipping(&usd(80_00))?, usd(0));

        Ok(())
    }
}
