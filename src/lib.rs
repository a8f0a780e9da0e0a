//! Larder
//!
//! Larder is the cart and order-totals core of a storefront: an observable in-session cart
//! store, the shipping policy applied to it, and the checkout payload handed to order creation.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod shipping;
pub mod totals;
