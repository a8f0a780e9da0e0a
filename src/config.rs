//! Store configuration

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{AUD, CAD, Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    pricing::{PricingError, from_decimal},
    shipping::{ShippingError, ShippingPolicy},
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A price is in a different currency from the store (expected, found)
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Price cannot be represented in minor units
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Shipping policy is invalid
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreConfigFile {
    currency: String,
    free_shipping_threshold: Option<String>,
    flat_shipping_rate: Option<String>,
}

/// Store-wide settings: the selling currency and shipping policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    currency: &'static Currency,
    shipping: ShippingPolicy<'static>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: USD,
            shipping: ShippingPolicy::standard(USD),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, names an unknown currency, or prices the
    /// shipping policy in a different currency from the store.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let file: StoreConfigFile = serde_norway::from_str(contents)?;
        let currency = parse_currency(&file.currency)?;

        let standard = ShippingPolicy::standard(currency);

        let threshold = match file.free_shipping_threshold.as_deref() {
            Some(price) => parse_price_in(price, currency)?,
            None => *standard.free_shipping_threshold(),
        };

        let flat_rate = match file.flat_shipping_rate.as_deref() {
            Some(price) => parse_price_in(price, currency)?,
            None => *standard.flat_rate(),
        };

        Ok(Self {
            currency,
            shipping: ShippingPolicy::new(threshold, flat_rate)?,
        })
    }

    /// Currency the store sells in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Shipping policy for orders.
    pub fn shipping_policy(&self) -> &ShippingPolicy<'static> {
        &self.shipping
    }
}

/// Look up a supported ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code {
        "USD" => Ok(USD),
        "GBP" => Ok(GBP),
        "EUR" => Ok(EUR),
        "CAD" => Ok(CAD),
        "AUD" => Ok(AUD),
        other => Err(ConfigError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "12.99 USD") into money.
///
/// # Errors
///
/// - [`ConfigError::InvalidPrice`]: The string is not `AMOUNT CURRENCY`.
/// - [`ConfigError::UnknownCurrency`]: The currency code is not supported.
/// - [`ConfigError::Pricing`]: The amount does not fit in minor units.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, ConfigError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ConfigError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| ConfigError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(code)?;

    Ok(from_decimal(amount, currency)?)
}

/// Parse a price and check it is in the expected currency.
///
/// # Errors
///
/// As [`parse_price`], plus [`ConfigError::CurrencyMismatch`] if the currency differs.
pub fn parse_price_in(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ConfigError> {
    let price = parse_price(s)?;

    if price.currency() == currency {
        Ok(price)
    } else {
        Err(ConfigError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price.currency().iso_alpha_code.to_string(),
        ))
    }
}
