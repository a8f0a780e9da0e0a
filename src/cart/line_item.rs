//! Line Items

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total},
    products::{ProductId, ProductSnapshot},
};

/// One product entry in a cart, with its quantity and snapshotted unit price.
///
/// Quantity is always at least one while the line is held by a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    product: ProductSnapshot<'a>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Create a new line item.
    pub fn new(product: ProductSnapshot<'a>, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product snapshot taken when the line was created.
    pub fn product(&self) -> &ProductSnapshot<'a> {
        &self.product
    }

    /// Product identifier
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.product.name
    }

    /// Product image
    pub fn image_url(&self) -> &str {
        &self.product.image_url
    }

    /// Product page slug
    pub fn slug(&self) -> &str {
        &self.product.slug
    }

    /// Unit price at add-time
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.product.unit_price
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total exceeds the minor unit range.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_total(&self.product.unit_price, self.quantity)
    }

    pub(super) fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    pub(super) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
