//! Fixtures
//!
//! Scripted cart sessions: a product catalogue and the sequence of cart actions a shopper took,
//! loaded from YAML and replayed against a fresh [`Cart`].

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    cart::{Cart, CartError},
    config::{ConfigError, parse_currency, parse_price_in},
    products::{ProductId, ProductSnapshot},
};

pub mod products;

use products::ProductFixture;

/// Session fixture errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error reading the session file
    #[error("Failed to read session file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price or currency error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An action referenced a product missing from the catalogue
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A cart operation was rejected (action index, error)
    #[error("Action {0} was rejected: {1}")]
    Rejected(usize, CartError),
}

/// A single shopper action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    /// Add units of a catalogue product
    Add {
        /// Catalogue key
        product: String,

        /// Units to add
        #[serde(default = "default_quantity")]
        quantity: u32,
    },

    /// Remove a product's line
    Remove {
        /// Catalogue key
        product: String,
    },

    /// Set a product's quantity
    Update {
        /// Catalogue key
        product: String,

        /// New quantity; zero or less removes the line
        quantity: i64,
    },

    /// Add one unit to a product's line
    Increment {
        /// Catalogue key
        product: String,
    },

    /// Take one unit from a product's line
    Decrement {
        /// Catalogue key
        product: String,
    },

    /// Empty the cart
    Clear,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    currency: String,
    tax: Option<String>,
    products: FxHashMap<String, ProductFixture>,
    #[serde(default)]
    actions: Vec<SessionAction>,
}

/// A loaded cart session.
#[derive(Debug)]
pub struct Session {
    currency: &'static Currency,
    tax: Money<'static, Currency>,
    catalogue: FxHashMap<String, ProductSnapshot<'static>>,
    actions: Vec<SessionAction>,
}

impl Session {
    /// Load a session from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a session from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, a price cannot be parsed, or an action
    /// references an unknown product.
    pub fn from_yaml(contents: &str) -> Result<Self, SessionError> {
        let file: SessionFile = serde_norway::from_str(contents)?;
        let currency = parse_currency(&file.currency)?;

        let tax = match file.tax.as_deref() {
            Some(price) => parse_price_in(price, currency)?,
            None => Money::from_minor(0, currency),
        };

        let mut catalogue = FxHashMap::default();

        for (key, fixture) in file.products {
            let product = fixture.into_snapshot(&key, currency)?;
            catalogue.insert(key, product);
        }

        for action in &file.actions {
            if let Some(key) = action.product()
                && !catalogue.contains_key(key)
            {
                return Err(SessionError::ProductNotFound(key.to_string()));
            }
        }

        Ok(Self {
            currency,
            tax,
            catalogue,
            actions: file.actions,
        })
    }

    /// Currency of the session's cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Tax supplied for checkout.
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Actions in the order they are replayed.
    pub fn actions(&self) -> &[SessionAction] {
        &self.actions
    }

    /// Look up a catalogue product by key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProductNotFound`] if the key is not in the catalogue.
    pub fn product(&self, key: &str) -> Result<&ProductSnapshot<'static>, SessionError> {
        self.catalogue
            .get(key)
            .ok_or_else(|| SessionError::ProductNotFound(key.to_string()))
    }

    /// Replay the actions against a new cart.
    ///
    /// # Errors
    ///
    /// See [`Session::replay_into`].
    pub fn replay(&self) -> Result<Cart<'static>, SessionError> {
        let mut cart = Cart::new(self.currency);

        self.replay_into(&mut cart)?;

        Ok(cart)
    }

    /// Replay the actions against an existing cart, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Rejected`] if the cart rejects an add, e.g. a zero quantity.
    #[instrument(skip_all, fields(actions = self.actions.len()))]
    pub fn replay_into(&self, cart: &mut Cart<'_>) -> Result<(), SessionError> {
        for (index, action) in self.actions.iter().enumerate() {
            debug!(index, ?action, "replaying cart action");

            match action {
                SessionAction::Add { product, quantity } => {
                    let snapshot = self.product(product)?.clone();

                    cart.add_item(snapshot, *quantity)
                        .map_err(|err| SessionError::Rejected(index, err))?;
                }
                SessionAction::Remove { product } => {
                    cart.remove_item(&self.product_id(product)?);
                }
                SessionAction::Update { product, quantity } => {
                    cart.update_quantity(&self.product_id(product)?, *quantity);
                }
                SessionAction::Increment { product } => {
                    cart.increment(&self.product_id(product)?);
                }
                SessionAction::Decrement { product } => {
                    cart.decrement(&self.product_id(product)?);
                }
                SessionAction::Clear => {
                    cart.clear();
                }
            }
        }

        Ok(())
    }

    fn product_id(&self, key: &str) -> Result<ProductId, SessionError> {
        Ok(self.product(key)?.id.clone())
    }
}

impl SessionAction {
    /// Catalogue key the action refers to, if any.
    pub fn product(&self) -> Option<&str> {
        match self {
            Self::Add { product, .. }
            | Self::Remove { product }
            | Self::Update { product, .. }
            | Self::Increment { product }
            | Self::Decrement { product } => Some(product),
            Self::Clear => None,
        }
    }
}
