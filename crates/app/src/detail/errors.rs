//! Product detail errors.

use thiserror::Error;

use crate::{api::ApiError, cart::CartStoreError};

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no product slug given")]
    MissingSlug,

    #[error("product not found")]
    NotFound(#[source] ApiError),

    #[error("failed to load product")]
    Api(#[source] ApiError),

    #[error("no product loaded")]
    NoProduct,

    #[error("product is not available")]
    Unavailable,

    #[error("product is already being added")]
    Busy,

    #[error(transparent)]
    Cart(#[from] CartStoreError),

    #[error("detail page closed")]
    Unmounted,
}

impl From<ApiError> for DetailError {
    fn from(error: ApiError) -> Self {
        if error.is_not_found() {
            Self::NotFound(error)
        } else {
            Self::Api(error)
        }
    }
}
