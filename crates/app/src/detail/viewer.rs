//! Product detail viewer
//!
//! One product by slug, a handful of related products from the same
//! category, a quantity selector and add-to-cart.

use std::{sync::Arc, time::Duration};

use tani::{
    cart::Quantity,
    catalog::ProductQuery,
    products::{Product, ProductId},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    api::StorefrontApi,
    cart::CartStore,
    detail::errors::DetailError,
    feedback::{Feedback, FeedbackKind, TransientFeedback},
    lifecycle::{InFlight, Lifecycle},
};

/// Page size of the related-products request.
pub const RELATED_PER_PAGE: u32 = 5;

/// Related products shown.
pub const RELATED_LIMIT: usize = 4;

const SUCCESS_TTL: Duration = Duration::from_millis(2_500);
const ERROR_TTL: Duration = Duration::from_secs(3);

const MISSING_SLUG: &str = "No product was specified.";
const NOT_FOUND: &str = "The product you are looking for was not found.";
const LOAD_FAILED: &str = "Could not load the product. Please try again later.";
const RELATED_FAILED: &str = "Could not load related products.";
const ADD_FAILED: &str = "Could not add the product to the cart.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub product: Option<Product>,
    pub loading: bool,
    pub error: Option<String>,

    pub related: Vec<Product>,
    pub related_error: Option<String>,

    /// Units to add, never below one
    pub quantity: Quantity,
}

/// Product detail page controller.
pub struct ProductDetailViewer {
    api: Arc<dyn StorefrontApi>,
    cart: Arc<CartStore>,
    lifecycle: Lifecycle,
    adding: InFlight,
    feedback: TransientFeedback,
    state: watch::Sender<DetailState>,
}

impl ProductDetailViewer {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, cart: Arc<CartStore>) -> Self {
        Self {
            api,
            cart,
            lifecycle: Lifecycle::new(),
            adding: InFlight::default(),
            feedback: TransientFeedback::default(),
            state: watch::Sender::new(DetailState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    /// Load the product behind `slug`, then its related products. A failed
    /// related request leaves the product itself on display.
    ///
    /// # Errors
    ///
    /// Returns an error when the slug is empty or the product cannot be
    /// loaded.
    pub async fn load(&self, slug: &str) -> Result<(), DetailError> {
        let slug = slug.trim();

        if slug.is_empty() {
            self.state.send_modify(|state| {
                *state = DetailState {
                    error: Some(MISSING_SLUG.to_string()),
                    ..DetailState::default()
                };
            });

            return Err(DetailError::MissingSlug);
        }

        self.state.send_modify(|state| {
            *state = DetailState {
                loading: true,
                ..DetailState::default()
            };
        });

        debug!(slug, "loading product");

        let result = self.api.product(slug.to_string()).await;

        if !self.lifecycle.is_mounted() {
            return Err(DetailError::Unmounted);
        }

        let product = match result {
            Ok(product) => product,
            Err(error) => {
                let error = DetailError::from(error);

                warn!(slug, %error, "failed to load product");

                let message = match error {
                    DetailError::NotFound(_) => NOT_FOUND,
                    _ => LOAD_FAILED,
                };

                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message.to_string());
                });

                return Err(error);
            }
        };

        let category = product.category_slug().map(ToString::to_string);
        let id = product.id;

        self.state.send_modify(|state| {
            state.product = Some(product);
            state.loading = false;
            state.quantity = Quantity::ONE;
        });

        if let Some(category) = category {
            self.load_related(id, &category).await?;
        }

        Ok(())
    }

    async fn load_related(&self, id: ProductId, category: &str) -> Result<(), DetailError> {
        let result = self
            .api
            .list_products(ProductQuery::by_category(category, RELATED_PER_PAGE))
            .await;

        if !self.lifecycle.is_mounted() {
            return Err(DetailError::Unmounted);
        }

        match result {
            Ok(page) => {
                let related: Vec<_> = page
                    .data
                    .into_iter()
                    .filter(|product| product.id != id)
                    .take(RELATED_LIMIT)
                    .collect();

                debug!(category, count = related.len(), "loaded related products");

                self.state.send_modify(|state| state.related = related);
            }
            Err(error) => {
                warn!(category, %error, "failed to load related products");

                self.state.send_modify(|state| {
                    state.related.clear();
                    state.related_error = Some(RELATED_FAILED.to_string());
                });
            }
        }

        Ok(())
    }

    /// Set the quantity selector, clamped to at least one.
    pub fn set_quantity(&self, requested: i64) {
        self.state
            .send_modify(|state| state.quantity = Quantity::clamped(requested));
    }

    /// Step the quantity selector by `delta`, never below one.
    pub fn step_quantity(&self, delta: i64) {
        self.state
            .send_modify(|state| state.quantity = state.quantity.stepped(delta));
    }

    /// Whether the add button should be enabled.
    pub fn can_add(&self) -> bool {
        !self.adding.is_busy()
            && self
                .state
                .borrow()
                .product
                .as_ref()
                .is_some_and(Product::is_available)
    }

    /// Add the selected quantity of the loaded product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when no product is loaded, it is unavailable, an add
    /// is already in flight, or the cart rejects the item.
    pub async fn add_to_cart(&self) -> Result<(), DetailError> {
        let (product, quantity) = {
            let state = self.state.borrow();

            (state.product.clone(), state.quantity)
        };

        let product = product.ok_or(DetailError::NoProduct)?;

        if !product.is_available() {
            debug!(product = %product.id, "add to cart refused, product unavailable");

            return Err(DetailError::Unavailable);
        }

        let _adding = self.adding.try_claim().ok_or(DetailError::Busy)?;

        match self.cart.add(product.id, quantity).await {
            Ok(()) => {
                info!(product = %product.id, quantity = quantity.get(), "added from detail page");

                self.feedback.show(
                    FeedbackKind::Success,
                    format!("{} × {} added to the cart.", quantity.get(), product.name),
                    SUCCESS_TTL,
                );

                Ok(())
            }
            Err(error) => {
                self.feedback
                    .show(FeedbackKind::Error, error.message_or(ADD_FAILED), ERROR_TTL);

                Err(error.into())
            }
        }
    }

    /// Add-to-cart feedback still on display.
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.current()
    }
}
