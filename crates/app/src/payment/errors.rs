//! Payment errors.

use thiserror::Error;

use crate::{api::ApiError, payment::uploader::ProofUploadError};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("failed to load order")]
    Api(#[from] ApiError),

    #[error("no order loaded")]
    NoOrder,

    #[error(transparent)]
    Upload(#[from] ProofUploadError),

    #[error("payment page closed")]
    Unmounted,
}
