//! Larder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartError, CartEvent, CartObserver, CartView, FnObserver, LineItem, SubscriptionKey,
        TracingObserver,
    },
    checkout::{CheckoutError, CheckoutItem, CheckoutPayload},
    config::{ConfigError, StoreConfig},
    fixtures::{Session, SessionAction, SessionError},
    pricing::PricingError,
    products::{ProductId, ProductSnapshot},
    receipt::ReceiptError,
    shipping::{ShippingError, ShippingPolicy},
    totals::{OrderTotals, TotalsError},
};
