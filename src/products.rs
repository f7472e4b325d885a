//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    prices::Rupiah,
    records::{CategoryRecord, ProductRecord},
};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Category Id
pub type CategoryId = TypedId<Category>;

/// Availability value the backend uses for in-stock products.
pub const AVAILABLE: &str = "tersedia";

/// Image shown when a product has no primary image.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/400x300/e2e8f0/94a3b8?text=Gambar+Pupuk";

/// Product (`pupuk`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    /// Backend id
    pub id: ProductId,

    /// URL slug used by the detail endpoint
    pub slug: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Rupiah,

    /// Long description
    pub description: Option<String>,

    /// Primary image URL
    pub image_url: Option<String>,

    /// Availability status
    pub availability: Availability,

    /// Units in stock, when reported
    pub stock: Option<u64>,

    /// Category reference
    pub category: Option<Category>,
}

impl Product {
    /// Whether the product can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    /// Primary image URL, or the placeholder when missing.
    pub fn image_url_or_placeholder(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// Slug of the category, if the product has one.
    pub fn category_slug(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|category| category.slug.as_str())
            .filter(|slug| !slug.is_empty())
    }
}

/// Category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryRecord", into = "CategoryRecord")]
pub struct Category {
    /// Backend id
    pub id: CategoryId,

    /// URL slug
    pub slug: String,

    /// Display name
    pub name: String,
}

/// Availability status (`status_ketersediaan`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    /// `"tersedia"`, in any letter case
    Available,

    /// Any other status, kept verbatim for display
    Unavailable(String),
}

impl Availability {
    /// Parse a raw backend status.
    pub fn from_status(status: &str) -> Self {
        if status.trim().eq_ignore_ascii_case(AVAILABLE) {
            Self::Available
        } else {
            Self::Unavailable(status.to_string())
        }
    }

    /// Whether this status allows adding to a cart.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Raw status label.
    pub fn label(&self) -> &str {
        match self {
            Self::Available => AVAILABLE,
            Self::Unavailable(status) => status,
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::Unavailable(String::new())
    }
}

impl From<Option<String>> for Availability {
    fn from(value: Option<String>) -> Self {
        value.map_or_else(Self::default, |status| Self::from_status(&status))
    }
}

impl Display for Availability {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}
