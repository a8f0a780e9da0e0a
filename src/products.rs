//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Image shown for products that were added without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Opaque product identifier, unique per distinct product within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product details captured at the moment a product is added to a cart.
///
/// The unit price is a snapshot: later catalogue price changes do not reach
/// line items that already hold it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Primary product image
    pub image_url: String,

    /// URL slug of the product page
    pub slug: String,

    /// Unit price at add-time
    pub unit_price: Money<'a, Currency>,
}

impl<'a> ProductSnapshot<'a> {
    /// Create a snapshot with a placeholder image and the identifier as its slug.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        let id = id.into();
        let slug = id.as_str().to_string();

        Self {
            id,
            name: name.into(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            slug,
            unit_price,
        }
    }

    /// Set the product image.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Set the product page slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn new_defaults_image_and_slug() {
        let product = ProductSnapshot::new("garlic-oil", "Garlic Oil", Money::from_minor(6_50, USD));

        assert_eq!(product.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(product.slug, "garlic-oil");
        assert_eq!(product.unit_price, Money::from_minor(6_50, USD));
    }

    #[test]
    fn builders_override_display_metadata() {
        let product = ProductSnapshot::new("sku-1", "Chilli Crisp", Money::from_minor(9_00, USD))
            .with_image_url("/images/chilli.jpg")
            .with_slug("chilli-crisp");

        assert_eq!(product.image_url, "/images/chilli.jpg");
        assert_eq!(product.slug, "chilli-crisp");
    }

    #[test]
    fn product_id_displays_raw_value() {
        let id = ProductId::from("abc-123");

        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(id.as_str(), "abc-123");
    }
}
