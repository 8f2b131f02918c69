//! Value objects for a product submission.

use serde::{Deserialize, Serialize};

/// Stock keeping unit identifying the product at every marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a new SKU from a string.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Price in minor currency units (cents) to avoid floating point issues.
///
/// Serializes as a bare integer, which is the shape both marketplaces
/// expect on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Creates a price from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

/// A product submission as accepted at the API boundary.
///
/// The boundary layer restricts the input to exactly these fields before
/// the sync flow runs; the model itself does no content validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Human-readable product name.
    pub name: String,

    /// Price in cents.
    pub price: Price,

    /// Stock keeping unit.
    pub sku: Sku,
}

impl ProductRequest {
    /// Creates a new product request.
    pub fn new(name: impl Into<String>, price: Price, sku: impl Into<Sku>) -> Self {
        Self {
            name: name.into(),
            price,
            sku: sku.into(),
        }
    }
}

/// The payload Marketplace B expects when creating an inventory record.
///
/// Field names differ from [`ProductRequest`] because Marketplace B speaks
/// its own vocabulary: name becomes title, price becomes price_cents and
/// the SKU is the seller's SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDraft {
    /// Listing title.
    pub title: String,

    /// Price in cents.
    pub price_cents: Price,

    /// Seller-side stock keeping unit.
    pub seller_sku: Sku,
}

impl From<&ProductRequest> for InventoryDraft {
    fn from(product: &ProductRequest) -> Self {
        Self {
            title: product.name.clone(),
            price_cents: product.price,
            seller_sku: product.sku.clone(),
        }
    }
}
