//! App Context

use std::{sync::Arc, time::Duration};

use tani::catalog::DEFAULT_PER_PAGE;

use crate::{
    api::{HttpStorefrontApi, StorefrontApi},
    cart::CartStore,
    catalog::{CatalogBrowser, QuickAdd},
    checkout::CheckoutFlow,
    config::{ClientConfig, ConfigError, DEFAULT_SEARCH_DEBOUNCE_MS},
    detail::ProductDetailViewer,
    navigation::Navigator,
    payment::PaymentView,
};

/// Shared services every page controller is built from. The cart store is
/// shared, so a change made on one page is visible on all of them.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn StorefrontApi>,
    pub cart: Arc<CartStore>,
    pub navigator: Arc<dyn Navigator>,
    pub per_page: u32,
    pub search_debounce: Duration,
}

impl AppContext {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            cart: Arc::new(CartStore::new(api.clone())),
            api,
            navigator,
            per_page: DEFAULT_PER_PAGE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }

    /// Build application context talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the API base URL is invalid.
    pub fn from_config(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let api = HttpStorefrontApi::new(config.api()?);

        Ok(Self {
            per_page: config.per_page.max(1),
            search_debounce: config.search_debounce(),
            ..Self::new(Arc::new(api), navigator)
        })
    }

    pub fn catalog(&self) -> CatalogBrowser {
        CatalogBrowser::new(self.api.clone(), self.per_page, self.search_debounce)
    }

    pub fn quick_add(&self) -> QuickAdd {
        QuickAdd::new(self.cart.clone())
    }

    pub fn product_detail(&self) -> ProductDetailViewer {
        ProductDetailViewer::new(self.api.clone(), self.cart.clone())
    }

    pub fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new(self.api.clone(), self.cart.clone(), self.navigator.clone())
    }

    pub fn payment(&self) -> PaymentView {
        PaymentView::new(self.api.clone(), self.navigator.clone())
    }
}
