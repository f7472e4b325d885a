//! Cart store errors.

use tani::cart::LineError;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error(transparent)]
    Line(#[from] LineError),

    #[error("sign in to use the cart")]
    LoginRequired(#[source] ApiError),

    #[error("cart request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CartStoreError {
    fn from(error: ApiError) -> Self {
        if error.is_unauthenticated() {
            Self::LoginRequired(error)
        } else {
            Self::Api(error)
        }
    }
}

impl CartStoreError {
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired(_))
    }

    /// Underlying API failure, if the error came from the backend.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::LoginRequired(error) | Self::Api(error) => Some(error),
            Self::Line(_) => None,
        }
    }

    /// Server message, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.api_error()
            .map_or_else(|| self.to_string(), |error| error.message_or(fallback))
    }
}
