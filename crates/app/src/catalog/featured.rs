//! Landing page featured strip.

use tani::{
    catalog::{FEATURED_LIMIT, ProductQuery},
    products::Product,
};
use tracing::debug;

use crate::{api::StorefrontApi, catalog::errors::CatalogError};

/// First products of catalog page one.
///
/// # Errors
///
/// Returns an error when the product list cannot be loaded.
pub async fn featured_products(api: &dyn StorefrontApi) -> Result<Vec<Product>, CatalogError> {
    let page = api.list_products(ProductQuery::page(1)).await?;
    let mut products = page.data;

    products.truncate(FEATURED_LIMIT);

    debug!(count = products.len(), "loaded featured products");

    Ok(products)
}
