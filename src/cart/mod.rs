//! Cart
//!
//! The in-session cart store. A [`Cart`] owns its line items and is only changed through its
//! operations; every change is published to subscribed [`CartObserver`]s.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    pricing::{self, PricingError},
    products::{ProductId, ProductSnapshot},
};

mod line_item;
mod observer;

pub use line_item::LineItem;
pub use observer::{CartEvent, CartObserver, CartView, FnObserver, TracingObserver};

new_key_type! {
    /// Handle for an observer subscription.
    pub struct SubscriptionKey;
}

/// Errors raised when adding a product to a cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product was added with a quantity of zero.
    #[error("Cannot add {0} with a quantity of zero")]
    InvalidQuantity(ProductId),

    /// A product's price currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product was added with a price below zero.
    #[error("Product {0} has a negative unit price")]
    NegativePrice(ProductId),
}

/// Cart
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'a Currency,
    observers: SlotMap<SubscriptionKey, Box<dyn CartObserver + 'a>>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            observers: SlotMap::with_key(),
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart its quantity grows and the existing snapshot is
    /// kept; otherwise a new line item is appended. Quantities saturate at [`u32::MAX`], and an
    /// add that leaves a saturated line unchanged publishes nothing.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::CurrencyMismatch`]: The product is priced in another currency.
    /// - [`CartError::NegativePrice`]: The unit price is below zero.
    pub fn add_item(&mut self, product: ProductSnapshot<'a>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(product.id));
        }

        let product_currency = product.unit_price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if pricing::is_negative(&product.unit_price) {
            return Err(CartError::NegativePrice(product.id));
        }

        let event = if let Some(line) = self.items.iter_mut().find(|line| line.id() == &product.id) {
            let previous = line.quantity();

            line.add_quantity(quantity);

            if line.quantity() == previous {
                return Ok(());
            }

            CartEvent::QuantityChanged {
                product_id: product.id,
                previous,
                quantity: line.quantity(),
            }
        } else {
            let product_id = product.id.clone();

            self.items.push(LineItem::new(product, quantity));

            CartEvent::ItemAdded {
                product_id,
                quantity,
            }
        };

        debug!(?event, "added item to cart");

        self.publish(&event);

        Ok(())
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item`].
    pub fn add_one(&mut self, product: ProductSnapshot<'a>) -> Result<(), CartError> {
        self.add_item(product, 1)
    }

    /// Remove a product's line item. Returns `false` if the product was not in the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let Some(position) = self.position(product_id) else {
            return false;
        };

        let line = self.items.remove(position);

        let event = CartEvent::ItemRemoved {
            product_id: line.id().clone(),
            quantity: line.quantity(),
        };

        debug!(?event, "removed item from cart");

        self.publish(&event);

        true
    }

    /// Set a product's quantity directly.
    ///
    /// A quantity of zero or less removes the line item. Returns `false` if the product was not
    /// in the cart or already had that quantity.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let Some(line) = self.items.iter_mut().find(|line| line.id() == product_id) else {
            return false;
        };

        let previous = line.quantity();

        if previous == quantity {
            return false;
        }

        line.set_quantity(quantity);

        let event = CartEvent::QuantityChanged {
            product_id: product_id.clone(),
            previous,
            quantity,
        };

        debug!(?event, "updated cart quantity");

        self.publish(&event);

        true
    }

    /// Add one unit to an existing line item.
    pub fn increment(&mut self, product_id: &ProductId) -> bool {
        match self.get(product_id) {
            Some(line) => {
                let quantity = i64::from(line.quantity()) + 1;
                self.update_quantity(product_id, quantity)
            }
            None => false,
        }
    }

    /// Take one unit from an existing line item, removing it at zero.
    pub fn decrement(&mut self, product_id: &ProductId) -> bool {
        match self.get(product_id) {
            Some(line) => {
                let quantity = i64::from(line.quantity()) - 1;
                self.update_quantity(product_id, quantity)
            }
            None => false,
        }
    }

    /// Remove every line item. Returns `false` if the cart was already empty.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }

        let event = CartEvent::Cleared {
            lines: self.items.len(),
        };

        self.items.clear();

        debug!(?event, "cleared cart");

        self.publish(&event);

        true
    }

    /// Register an observer for future changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'a) -> SubscriptionKey {
        self.observers.insert(Box::new(observer))
    }

    /// Register a closure for future changes.
    pub fn subscribe_fn<F>(&mut self, f: F) -> SubscriptionKey
    where
        F: FnMut(&CartEvent, CartView<'_, '_>) + 'a,
    {
        self.subscribe(FnObserver::new(f))
    }

    /// Remove a subscription. Returns `false` if the key was not subscribed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.observers.remove(key).is_some()
    }

    /// Read-only view of the current contents.
    pub fn view(&self) -> CartView<'_, 'a> {
        CartView::new(&self.items, self.currency)
    }

    /// Find the line item for a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem<'a>> {
        self.items.iter().find(|line| line.id() == product_id)
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Sum of quantities across all line items.
    pub fn item_count(&self) -> u64 {
        self.view().item_count()
    }

    /// Sum of unit price multiplied by quantity across all line items.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::subtotal(&self.items, self.currency)
    }

    /// Number of distinct line items.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|line| line.id() == product_id)
    }

    fn publish(&mut self, event: &CartEvent) {
        let view = CartView::new(&self.items, self.currency);

        for (key, observer) in &mut self.observers {
            trace!(?key, "notifying cart observer");
            observer.on_change(event, view);
        }
    }
}

impl fmt::Debug for Cart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("currency", &self.currency.iso_alpha_code)
            .field("observers", &self.observers.len())
            .finish()
    }
}
