//! Checkout errors.

use tani::orders::CheckoutValidationError;
use thiserror::Error;

use crate::{api::ApiError, cart::CartStoreError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Blocking form or cart problem; nothing was sent.
    #[error(transparent)]
    Validation(#[from] CheckoutValidationError),

    #[error("an order is already being placed")]
    AlreadySubmitting,

    /// A cart line still has an update or removal in flight.
    #[error("the cart is still being updated")]
    CartBusy,

    #[error("sign in to check out")]
    LoginRequired,

    #[error("failed to load the cart")]
    Cart(#[source] CartStoreError),

    #[error("failed to create the order")]
    Api(#[source] ApiError),

    #[error("checkout closed")]
    Unmounted,
}
