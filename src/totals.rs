//! Order Totals

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartView},
    pricing::{self, PricingError},
    shipping::ShippingPolicy,
};

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// Tax supplied by checkout was below zero.
    #[error("Tax cannot be negative: {0}")]
    NegativeTax(String),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// The values submitted to checkout for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals<'a> {
    item_count: u64,
    subtotal: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    total: Money<'a, Currency>,
    progress_percent: u8,
    free_shipping: bool,
}

impl<'a> OrderTotals<'a> {
    /// Calculate totals for a cart.
    ///
    /// # Errors
    ///
    /// See [`OrderTotals::from_view`].
    pub fn for_cart(
        cart: &Cart<'a>,
        policy: &ShippingPolicy<'a>,
        tax: Money<'a, Currency>,
    ) -> Result<Self, TotalsError> {
        Self::from_view(cart.view(), policy, tax)
    }

    /// Calculate totals for a cart view.
    ///
    /// Tax is not computed here; it is supplied by the checkout flow. An empty cart has nothing
    /// to ship, so it is never charged shipping and never counts as shipping for free.
    ///
    /// # Errors
    ///
    /// - [`TotalsError::NegativeTax`]: The supplied tax is below zero.
    /// - [`TotalsError::Pricing`]: A line total overflowed, or the policy or tax use another
    ///   currency.
    pub fn from_view(
        cart: CartView<'_, 'a>,
        policy: &ShippingPolicy<'a>,
        tax: Money<'a, Currency>,
    ) -> Result<Self, TotalsError> {
        if pricing::is_negative(&tax) {
            return Err(TotalsError::NegativeTax(tax.to_string()));
        }

        let subtotal = cart.subtotal()?;
        let progress_percent = policy.progress_percent(&subtotal)?;

        let free_shipping = !cart.is_empty() && policy.qualifies_for_free_shipping(&subtotal)?;

        let shipping = if cart.is_empty() {
            Money::from_minor(0, cart.currency())
        } else {
            policy.shipping_for(&subtotal)?
        };

        let total = subtotal
            .add(shipping)
            .and_then(|amount| amount.add(tax))
            .map_err(PricingError::from)?;

        Ok(Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            tax,
            total,
            progress_percent,
            free_shipping,
        })
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Sum of line-item extended prices, excluding tax and shipping
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Shipping charge
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// Tax supplied by checkout
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Subtotal plus shipping plus tax
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Progress towards free shipping, for display.
    pub fn shipping_progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Check whether the subtotal reached the free-shipping threshold.
    ///
    /// This is independent of the shipping amount: a policy with a zero flat rate still charges
    /// nothing below the threshold, but the order has not earned free shipping.
    pub fn has_free_shipping(&self) -> bool {
        self.free_shipping
    }
}
