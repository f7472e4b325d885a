//! Catalog errors.

use thiserror::Error;

use crate::{api::ApiError, cart::CartStoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load products")]
    Api(#[from] ApiError),

    /// The list body carried products but no pagination metadata.
    #[error("unexpected catalog response: pagination metadata missing")]
    MissingMeta,

    /// The controller was unmounted before the response arrived.
    #[error("catalog closed")]
    Unmounted,
}

#[derive(Debug, Error)]
pub enum QuickAddError {
    #[error("product is not available")]
    Unavailable,

    #[error("another product is being added")]
    Busy,

    #[error(transparent)]
    Cart(#[from] CartStoreError),
}
