//! Cart change notifications.

use rusty_money::{Money, iso::Currency};
use tracing::info;

use crate::{
    cart::LineItem,
    pricing::{self, PricingError},
    products::ProductId,
};

/// A single state change published by a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line item was created.
    ItemAdded {
        /// Product on the new line
        product_id: ProductId,

        /// Quantity of the new line
        quantity: u32,
    },

    /// An existing line's quantity changed.
    QuantityChanged {
        /// Product on the line
        product_id: ProductId,

        /// Quantity before the change
        previous: u32,

        /// Quantity after the change
        quantity: u32,
    },

    /// A line item was removed.
    ItemRemoved {
        /// Product on the removed line
        product_id: ProductId,

        /// Quantity the line held when it was removed
        quantity: u32,
    },

    /// Every line item was removed.
    Cleared {
        /// Number of lines removed
        lines: usize,
    },
}

/// Read-only view of cart contents.
///
/// Derived values are computed from the line items on every call.
#[derive(Debug, Clone, Copy)]
pub struct CartView<'c, 'a> {
    items: &'c [LineItem<'a>],
    currency: &'a Currency,
}

impl<'c, 'a> CartView<'c, 'a> {
    /// Create a view over the given line items.
    pub fn new(items: &'c [LineItem<'a>], currency: &'a Currency) -> Self {
        Self { items, currency }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &'c [LineItem<'a>] {
        self.items
    }

    /// Find the line item for a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&'c LineItem<'a>> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Sum of quantities across all line items.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Sum of unit price multiplied by quantity across all line items.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::subtotal(self.items, self.currency)
    }

    /// Number of distinct line items.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check whether there are no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

/// Receives cart changes after they have been applied.
pub trait CartObserver {
    /// Called once per state change with the post-change contents.
    fn on_change(&mut self, event: &CartEvent, cart: CartView<'_, '_>);
}

/// Observer backed by a closure.
pub struct FnObserver<F>(F);

impl<F> FnObserver<F>
where
    F: FnMut(&CartEvent, CartView<'_, '_>),
{
    /// Wrap a closure as an observer.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> std::fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

impl<F> CartObserver for FnObserver<F>
where
    F: FnMut(&CartEvent, CartView<'_, '_>),
{
    fn on_change(&mut self, event: &CartEvent, cart: CartView<'_, '_>) {
        (self.0)(event, cart);
    }
}

/// Observer that emits every change as a `tracing` event.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_change(&mut self, event: &CartEvent, cart: CartView<'_, '_>) {
        info!(
            ?event,
            lines = cart.line_count(),
            item_count = cart.item_count(),
            "cart changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::ProductSnapshot;

    use super::*;

    fn items<'a>() -> [LineItem<'a>; 2] {
        [
            LineItem::new(
                ProductSnapshot::new("a", "Pesto", Money::from_minor(12_99, USD)),
                2,
            ),
            LineItem::new(
                ProductSnapshot::new("b", "Focaccia", Money::from_minor(8_00, USD)),
                1,
            ),
        ]
    }

    #[test]
    fn view_derives_totals_from_items() -> TestResult {
        let items = items();
        let view = CartView::new(&items, USD);

        assert_eq!(view.item_count(), 3);
        assert_eq!(view.line_count(), 2);
        assert_eq!(view.subtotal()?, Money::from_minor(33_98, USD));
        assert!(!view.is_empty());

        Ok(())
    }

    #[test]
    fn view_finds_items_by_product() {
        let items = items();
        let view = CartView::new(&items, USD);

        assert_eq!(
            view.get(&ProductId::from("b")).map(LineItem::quantity),
            Some(1)
        );
        assert!(view.get(&ProductId::from("missing")).is_none());
    }

    #[test]
    fn fn_observer_forwards_to_closure() {
        let items = items();
        let mut seen = Vec::new();

        {
            let mut observer = FnObserver::new(|event: &CartEvent, cart: CartView<'_, '_>| {
                seen.push((event.clone(), cart.item_count()));
            });

            observer.on_change(&CartEvent::Cleared { lines: 0 }, CartView::new(&items, USD));
        }

        assert_eq!(seen, vec![(CartEvent::Cleared { lines: 0 }, 3)]);
    }
}
