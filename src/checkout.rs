//! Checkout
//!
//! The snapshot of a cart handed to the order-creation endpoint. Amounts are written as decimal
//! numbers in major units, e.g. `12.99`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{CartView, LineItem},
    pricing::to_decimal,
    products::ProductId,
    totals::OrderTotals,
};

/// Errors raised while building or encoding a checkout payload.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// The payload could not be encoded.
    #[error("Failed to encode checkout payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of a checkout payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    /// Product identifier
    pub product_id: ProductId,

    /// Display name
    pub name: String,

    /// Snapshotted unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Number of units
    pub quantity: u32,
}

impl From<&LineItem<'_>> for CheckoutItem {
    fn from(line: &LineItem<'_>) -> Self {
        Self {
            product_id: line.id().clone(),
            name: line.name().to_string(),
            unit_price: to_decimal(line.unit_price()),
            quantity: line.quantity(),
        }
    }
}

/// Cart contents and totals submitted when an order is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// Line items in cart order
    pub items: Vec<CheckoutItem>,

    /// Sum of line-item extended prices
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Shipping charge
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,

    /// Tax supplied by checkout
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Subtotal plus shipping plus tax
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl CheckoutPayload {
    /// Snapshot a cart and its totals.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no line items.
    pub fn new(cart: CartView<'_, '_>, totals: &OrderTotals<'_>) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            items: cart.items().iter().map(CheckoutItem::from).collect(),
            subtotal: to_decimal(&totals.subtotal()),
            shipping: to_decimal(&totals.shipping()),
            tax: to_decimal(&totals.tax()),
            total: to_decimal(&totals.total()),
        })
    }

    /// Encode the payload as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, CheckoutError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode the payload as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Json`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, CheckoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
