//! Quick add from a catalog card.

use std::{sync::Arc, time::Duration};

use tani::{cart::Quantity, products::Product};
use tracing::debug;

use crate::{
    cart::CartStore,
    catalog::errors::QuickAddError,
    feedback::{Feedback, FeedbackKind, TransientFeedback},
    lifecycle::InFlight,
};

const SUCCESS_TTL: Duration = Duration::from_secs(2);
const ERROR_TTL: Duration = Duration::from_millis(2_500);

const LOGIN_FIRST: &str = "Please log in first to add items to the cart.";
const ADD_FAILED: &str = "Could not add the product to the cart.";

/// Adds one unit of a product straight from the catalog grid.
pub struct QuickAdd {
    cart: Arc<CartStore>,
    adding: InFlight,
    feedback: TransientFeedback,
}

impl QuickAdd {
    #[must_use]
    pub fn new(cart: Arc<CartStore>) -> Self {
        Self {
            cart,
            adding: InFlight::default(),
            feedback: TransientFeedback::default(),
        }
    }

    /// Whether the card's add button should be enabled.
    pub fn can_add(&self, product: &Product) -> bool {
        product.is_available() && !self.adding.is_busy()
    }

    /// Add one unit of `product`. Unavailable products are refused without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is unavailable, another add is in
    /// flight, or the cart rejects the item.
    pub async fn add(&self, product: &Product) -> Result<(), QuickAddError> {
        if !product.is_available() {
            debug!(product = %product.id, "quick add refused, product unavailable");

            return Err(QuickAddError::Unavailable);
        }

        let _adding = self.adding.try_claim().ok_or(QuickAddError::Busy)?;

        match self.cart.add(product.id, Quantity::ONE).await {
            Ok(()) => {
                self.feedback.show(
                    FeedbackKind::Success,
                    format!("{} added to the cart.", product.name),
                    SUCCESS_TTL,
                );

                Ok(())
            }
            Err(error) => {
                let message = if error.is_login_required() {
                    LOGIN_FIRST.to_string()
                } else {
                    error.message_or(ADD_FAILED)
                };

                self.feedback.show(FeedbackKind::Error, message, ERROR_TTL);

                Err(error.into())
            }
        }
    }

    /// Feedback still on display.
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.current()
    }
}
