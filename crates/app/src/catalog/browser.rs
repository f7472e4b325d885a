//! Catalog browser
//!
//! Product list with search, sort, availability filter and pagination. The
//! filters and page live in a [`CatalogLocation`] that round-trips through
//! the URL query string, so a shared link restores the same view.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tani::{
    catalog::{CatalogLocation, FilterChange, SortKey},
    pagination::{PageMeta, PageSlot, page_window},
    products::Product,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    api::StorefrontApi,
    catalog::{debounce::Debouncer, errors::CatalogError},
    lifecycle::Lifecycle,
};

const LOAD_FAILED: &str = "Could not load products. Please try again later.";
const FORMAT_ERROR: &str = "The server sent products in an unexpected format.";

/// Everything the catalog page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    /// Filters and page as synchronised with the URL
    pub location: CatalogLocation,

    /// Search box contents, ahead of the debounced filter
    pub search_input: String,

    pub products: Vec<Product>,
    pub meta: Option<PageMeta>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    /// Last page according to the latest response.
    pub fn last_page(&self) -> u32 {
        self.meta.as_ref().map_or(1, |meta| meta.last_page.max(1))
    }

    /// Compact page selector for the current page.
    pub fn page_window(&self) -> Vec<PageSlot> {
        page_window(self.location.page, self.last_page())
    }
}

/// Catalog page controller.
pub struct CatalogBrowser {
    api: Arc<dyn StorefrontApi>,
    per_page: u32,
    debouncer: Debouncer,
    lifecycle: Lifecycle,
    latest_request: AtomicU64,
    state: watch::Sender<CatalogState>,
}

impl CatalogBrowser {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, per_page: u32, search_debounce: Duration) -> Self {
        Self {
            api,
            per_page,
            debouncer: Debouncer::new(search_debounce),
            lifecycle: Lifecycle::new(),
            latest_request: AtomicU64::new(0),
            state: watch::Sender::new(CatalogState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Query string reflecting the current filters and page.
    pub fn query_string(&self) -> String {
        self.state.borrow().location.to_query()
    }

    /// Restore filters and page from a URL query string and load them.
    ///
    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn open(&self, query: &str) -> Result<(), CatalogError> {
        let location = CatalogLocation::from_query(query);

        self.state.send_modify(|state| {
            state.search_input.clone_from(&location.filters.search);
            state.location = location;
        });

        self.load().await
    }

    /// Record a search keystroke. Only the value still current once the
    /// debounce window has passed triggers a request; returns whether this
    /// call was that one.
    ///
    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn search(&self, text: impl Into<String>) -> Result<bool, CatalogError> {
        let text = text.into();

        self.state
            .send_modify(|state| state.search_input.clone_from(&text));

        if !self.debouncer.settle().await {
            debug!(search = %text, "search superseded");

            return Ok(false);
        }

        self.change(FilterChange::Search(text)).await?;

        Ok(true)
    }

    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn set_sort(&self, sort: SortKey) -> Result<(), CatalogError> {
        self.change(FilterChange::Sort(sort)).await
    }

    /// `None` shows every availability status.
    ///
    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn set_availability(&self, status: Option<String>) -> Result<(), CatalogError> {
        self.change(FilterChange::Availability(status)).await
    }

    /// Move to `page` when it exists and is not the current page. Returns
    /// whether a request was made.
    ///
    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn go_to_page(&self, page: u32) -> Result<bool, CatalogError> {
        let moved = self.state.send_if_modified(|state| {
            let last_page = state.last_page();

            state.location.go_to_page(page, last_page)
        });

        if !moved {
            debug!(page, "page change ignored");

            return Ok(false);
        }

        self.load().await?;

        Ok(true)
    }

    /// Clear search, sort and availability and return to page 1.
    ///
    /// # Errors
    ///
    /// Returns an error when the product list cannot be loaded.
    pub async fn reset_filters(&self) -> Result<(), CatalogError> {
        self.state.send_modify(|state| {
            state.location.reset();
            state.search_input.clear();
        });

        self.load().await
    }

    /// Stop applying responses; requests still in flight are discarded.
    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    async fn change(&self, change: FilterChange) -> Result<(), CatalogError> {
        let changed = self
            .state
            .send_if_modified(|state| state.location.apply(change));

        if changed {
            self.load().await?;
        }

        Ok(())
    }

    /// Fetch the products for the current location. Only the most recent
    /// request's response is applied.
    async fn load(&self) -> Result<(), CatalogError> {
        let ticket = self.latest_request.fetch_add(1, Ordering::AcqRel) + 1;
        let query = self.state.borrow().location.product_query(self.per_page);

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        debug!(?query, "loading catalog page");

        let result = self.api.list_products(query).await;

        if !self.lifecycle.is_mounted() {
            return Err(CatalogError::Unmounted);
        }

        if self.latest_request.load(Ordering::Acquire) != ticket {
            debug!(ticket, "discarding stale catalog response");

            return Ok(());
        }

        let result = result
            .map_err(CatalogError::from)
            .and_then(|page| match page.meta {
                None if !page.data.is_empty() => Err(CatalogError::MissingMeta),
                meta => Ok((page.data, meta)),
            });

        match result {
            Ok((products, meta)) => {
                self.state.send_modify(|state| {
                    state.products = products;
                    state.meta = meta;
                    state.loading = false;
                });

                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to load catalog page");

                let message = match &error {
                    CatalogError::Api(error) => error.message_or(LOAD_FAILED),
                    CatalogError::MissingMeta => FORMAT_ERROR.to_string(),
                    CatalogError::Unmounted => LOAD_FAILED.to_string(),
                };

                self.state.send_modify(|state| {
                    state.products.clear();
                    state.meta = None;
                    state.loading = false;
                    state.error = Some(message);
                });

                Err(error)
            }
        }
    }
}
