//! Product Fixtures

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    config::{ConfigError, parse_price_in},
    products::{PLACEHOLDER_IMAGE, ProductSnapshot},
};

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Product identifier, defaults to the catalogue key
    pub id: Option<String>,

    /// Product name
    pub name: String,

    /// Product price (e.g., "12.99 USD")
    pub price: String,

    /// Product image
    pub image: Option<String>,

    /// Product page slug, defaults to the catalogue key
    pub slug: Option<String>,
}

impl ProductFixture {
    /// Build the snapshot that is added to carts for this catalogue entry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the price cannot be parsed or is not in `currency`.
    pub fn into_snapshot(
        self,
        key: &str,
        currency: &'static Currency,
    ) -> Result<ProductSnapshot<'static>, ConfigError> {
        let price = parse_price_in(&self.price, currency)?;

        Ok(
            ProductSnapshot::new(self.id.unwrap_or_else(|| key.to_string()), self.name, price)
                .with_image_url(self.image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()))
                .with_slug(self.slug.unwrap_or_else(|| key.to_string())),
        )
    }
}
