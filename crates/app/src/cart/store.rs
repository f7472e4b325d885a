//! Cart store
//!
//! The single client-side source of truth for the cart. Pages subscribe to
//! [`CartStore::subscribe`] instead of refetching the cart themselves; every
//! mutation goes through the store, which applies it tentatively, sends it,
//! then replaces the lines with a fresh server snapshot.

use std::sync::Arc;

use tani::{
    cart::{
        CartItem, CartItemId, CartLines, LineError, NewCartItem, Quantity, QuantityChange,
    },
    prices::Rupiah,
    products::ProductId,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{api::StorefrontApi, cart::errors::CartStoreError, navigation::Confirmation};

const LOAD_FAILED: &str = "Could not load the cart.";
const UPDATE_FAILED: &str = "Could not update the item quantity.";
const REMOVE_FAILED: &str = "Could not remove the item.";
const REFRESH_FAILED: &str = "Saved, but the cart could not be refreshed.";

/// Load status of the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CartStatus {
    /// First fetch not finished
    #[default]
    Loading,

    /// Lines reflect the server
    Ready,

    /// The backend answered 401/403
    LoginRequired,

    /// Last fetch failed
    Failed(String),
}

/// Everything a cart view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub status: CartStatus,
    pub lines: CartLines,

    /// Inline notice left by the last failed mutation
    pub notice: Option<String>,
}

impl CartSnapshot {
    /// `Σ quantity × unit price` over the displayed lines.
    pub fn subtotal(&self) -> Rupiah {
        self.lines.subtotal()
    }

    /// Displayed items, in order.
    pub fn items(&self) -> Vec<CartItem> {
        self.lines.items().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// Requested quantity matched the current one; nothing was sent
    Unchanged,

    /// The server accepted the new quantity
    Updated(Quantity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user declined; nothing was sent
    Declined,

    /// The server removed the item
    Removed,
}

/// Shared cart state.
pub struct CartStore {
    api: Arc<dyn StorefrontApi>,
    state: watch::Sender<CartSnapshot>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(CartSnapshot::default()),
        }
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    pub fn subtotal(&self) -> Rupiah {
        self.state.borrow().subtotal()
    }

    /// Load the cart from the server.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails; the status then reads
    /// `LoginRequired` or `Failed` and the lines are emptied.
    pub async fn refresh(&self) -> Result<(), CartStoreError> {
        debug!("loading cart");

        match self.api.cart_items().await {
            Ok(items) => {
                debug!(lines = items.len(), "cart loaded");

                self.state.send_modify(|snapshot| {
                    snapshot.lines.replace_with_server(items);
                    snapshot.status = CartStatus::Ready;
                    snapshot.notice = None;
                });

                Ok(())
            }
            Err(error) => {
                let error = CartStoreError::from(error);

                warn!(%error, "failed to load cart");

                self.state.send_modify(|snapshot| {
                    snapshot.lines.clear();
                    snapshot.status = if error.is_login_required() {
                        CartStatus::LoginRequired
                    } else {
                        CartStatus::Failed(error.message_or(LOAD_FAILED))
                    };
                });

                Err(error)
            }
        }
    }

    /// Add `quantity` units of `product`, then reload the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the item.
    pub async fn add(&self, product: ProductId, quantity: Quantity) -> Result<(), CartStoreError> {
        self.api
            .add_cart_item(NewCartItem { product, quantity })
            .await
            .map_err(|error| {
                let error = CartStoreError::from(error);

                warn!(%product, %error, "add to cart failed");

                error
            })?;

        info!(%product, quantity = quantity.get(), "added to cart");

        if let Err(error) = self.refresh().await {
            warn!(%error, "cart reload after add failed");
        }

        Ok(())
    }

    /// Change a line's quantity. `requested` is clamped to at least one; an
    /// unchanged quantity sends nothing.
    ///
    /// The line is marked as updating and shows the new quantity until the
    /// server answers. On failure it returns to the last quantity the server
    /// confirmed and an inline notice is set.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is unknown, already pending, or the
    /// server rejects the change.
    pub async fn update_quantity(
        &self,
        id: CartItemId,
        requested: i64,
    ) -> Result<QuantityOutcome, CartStoreError> {
        let mut change = Ok(QuantityChange::Unchanged);

        self.state.send_if_modified(|snapshot| {
            change = snapshot.lines.begin_update(id, requested);

            matches!(change, Ok(QuantityChange::Pending(_)))
        });

        let quantity = match change? {
            QuantityChange::Unchanged => return Ok(QuantityOutcome::Unchanged),
            QuantityChange::Pending(quantity) => quantity,
        };

        debug!(%id, quantity = quantity.get(), "updating cart item");

        if let Err(error) = self.api.update_cart_item(id, quantity).await {
            let error = CartStoreError::from(error);

            warn!(%id, %error, "cart item update failed, rolling back");

            let notice = error.message_or(UPDATE_FAILED);

            self.state.send_modify(|snapshot| {
                snapshot.lines.rollback(id);
                snapshot.notice = Some(notice);
            });

            return Err(error);
        }

        self.settle(id, Settled::Kept).await;

        Ok(QuantityOutcome::Updated(quantity))
    }

    /// Remove a line after `confirmation` agrees. Declining sends nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is unknown, already pending, or the
    /// server rejects the removal.
    pub async fn remove_item(
        &self,
        id: CartItemId,
        confirmation: &dyn Confirmation,
    ) -> Result<RemoveOutcome, CartStoreError> {
        let name = {
            let snapshot = self.state.borrow();
            let line = snapshot.lines.get(id).ok_or(LineError::NotFound(id))?;

            if !line.is_idle() {
                return Err(LineError::Busy(id).into());
            }

            line.item.product.name.clone()
        };

        if !confirmation.confirm(&format!("Remove {name} from the cart?")) {
            debug!(%id, "removal declined");

            return Ok(RemoveOutcome::Declined);
        }

        let mut begun = Ok(());

        self.state.send_if_modified(|snapshot| {
            begun = snapshot.lines.begin_remove(id);

            begun.is_ok()
        });

        begun?;

        if let Err(error) = self.api.remove_cart_item(id).await {
            let error = CartStoreError::from(error);

            warn!(%id, %error, "cart item removal failed");

            let notice = error.message_or(REMOVE_FAILED);

            self.state.send_modify(|snapshot| {
                snapshot.lines.rollback(id);
                snapshot.notice = Some(notice);
            });

            return Err(error);
        }

        info!(%id, "removed from cart");

        self.settle(id, Settled::Removed).await;

        Ok(RemoveOutcome::Removed)
    }

    /// Drop every line locally, after the server cleared the cart.
    pub fn clear_local(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.lines.clear();
            snapshot.notice = None;
        });
    }

    pub fn dismiss_notice(&self) {
        self.state.send_if_modified(|snapshot| snapshot.notice.take().is_some());
    }

    /// Replace the lines with server truth after a successful mutation.
    async fn settle(&self, id: CartItemId, settled: Settled) {
        match self.api.cart_items().await {
            Ok(items) => self.state.send_modify(|snapshot| {
                snapshot.lines.replace_with_server(items);
                snapshot.lines.confirm(id);
                snapshot.status = CartStatus::Ready;
                snapshot.notice = None;
            }),
            Err(error) => {
                warn!(%id, %error, "cart reload after mutation failed");

                self.state.send_modify(|snapshot| {
                    match settled {
                        Settled::Kept => snapshot.lines.confirm(id),
                        Settled::Removed => snapshot.lines.remove(id),
                    }

                    snapshot.notice = Some(REFRESH_FAILED.to_string());
                });
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Settled {
    Kept,
    Removed,
}

#[cfg(test)]
mod tests {
    use tani::cart::LineState;
    use testresult::TestResult;

    use super::*;
    use crate::{
        api::{ApiError, MockStorefrontApi},
        navigation::MockConfirmation,
        test::{cart_item, expect_cart_loads, product, server_error, unauthenticated},
    };

    fn urea_cart(quantity: u32) -> Vec<CartItem> {
        vec![cart_item(1, product(10, "Urea", 50_000), quantity)]
    }

    /// Store whose first load returns two units of Urea, followed by
    /// `reloads`.
    async fn loaded_store(
        mut api: MockStorefrontApi,
        reloads: Vec<Vec<CartItem>>,
    ) -> Result<CartStore, CartStoreError> {
        expect_cart_loads(&mut api, [urea_cart(2)].into_iter().chain(reloads));

        let store = CartStore::new(Arc::new(api));
        store.refresh().await?;

        Ok(store)
    }

    #[tokio::test]
    async fn refresh_publishes_server_lines() -> TestResult {
        let store = loaded_store(MockStorefrontApi::new(), Vec::new()).await?;
        let snapshot = store.snapshot();

        assert_eq!(snapshot.status, CartStatus::Ready);
        assert_eq!(snapshot.subtotal(), Rupiah::new(100_000));
        assert_eq!(snapshot.subtotal().to_string(), "Rp100.000");

        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_refresh_requires_login() {
        let mut api = MockStorefrontApi::new();

        api.expect_cart_items()
            .once()
            .return_once(|| Err(unauthenticated()));

        let store = CartStore::new(Arc::new(api));
        let result = store.refresh().await;

        assert!(
            matches!(result, Err(CartStoreError::LoginRequired(_))),
            "expected LoginRequired, got {result:?}"
        );
        assert_eq!(store.snapshot().status, CartStatus::LoginRequired);
        assert!(store.snapshot().lines.is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_message() {
        let mut api = MockStorefrontApi::new();

        api.expect_cart_items()
            .once()
            .return_once(|| Err(server_error("Database down")));

        let store = CartStore::new(Arc::new(api));
        let _result = store.refresh().await;

        assert_eq!(
            store.snapshot().status,
            CartStatus::Failed("Database down".to_string())
        );
    }

    #[tokio::test]
    async fn unchanged_quantity_sends_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_update_cart_item().never();

        let store = loaded_store(api, Vec::new()).await?;
        let outcome = store.update_quantity(CartItemId::new(1), 2).await?;

        assert_eq!(outcome, QuantityOutcome::Unchanged);

        Ok(())
    }

    #[tokio::test]
    async fn quantity_below_one_is_clamped_before_sending() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_update_cart_item()
            .once()
            .withf(|id, quantity| *id == CartItemId::new(1) && quantity.get() == 1)
            .return_once(|_, _| Ok(()));

        let store = loaded_store(api, vec![urea_cart(1)]).await?;
        let outcome = store.update_quantity(CartItemId::new(1), -3).await?;

        assert_eq!(outcome, QuantityOutcome::Updated(Quantity::ONE));
        assert_eq!(store.subtotal(), Rupiah::new(50_000));

        Ok(())
    }

    #[tokio::test]
    async fn successful_update_takes_server_truth() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_update_cart_item()
            .once()
            .return_once(|_, _| Ok(()));

        let store = loaded_store(api, vec![urea_cart(4)]).await?;
        store.update_quantity(CartItemId::new(1), 5).await?;

        let snapshot = store.snapshot();
        let line = snapshot.lines.get(CartItemId::new(1)).ok_or("line missing")?;

        assert_eq!(line.item.quantity.get(), 4);
        assert_eq!(line.confirmed_quantity().get(), 4);
        assert_eq!(line.state, LineState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn failed_update_rolls_back_and_sets_notice() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_update_cart_item().once().return_once(|_, _| {
            Err(ApiError::from_response(
                reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                br#"{"message":"Stok tidak cukup."}"#,
            ))
        });

        let store = loaded_store(api, Vec::new()).await?;
        let mut updates = store.subscribe();
        updates.mark_unchanged();

        let result = store.update_quantity(CartItemId::new(1), 9).await;

        assert!(result.is_err(), "expected failure, got {result:?}");

        let snapshot = store.snapshot();
        let line = snapshot.lines.get(CartItemId::new(1)).ok_or("line missing")?;

        assert_eq!(line.item.quantity.get(), 2);
        assert!(line.is_idle());
        assert_eq!(snapshot.notice.as_deref(), Some("Stok tidak cukup."));
        assert_eq!(snapshot.subtotal(), Rupiah::new(100_000));
        assert!(updates.has_changed()?);

        Ok(())
    }

    #[tokio::test]
    async fn declined_removal_sends_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_remove_cart_item().never();

        let mut confirmation = MockConfirmation::new();
        confirmation.expect_confirm().once().return_const(false);

        let store = loaded_store(api, Vec::new()).await?;
        let outcome = store
            .remove_item(CartItemId::new(1), &confirmation)
            .await?;

        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(store.snapshot().lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_removal_reloads_cart() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_remove_cart_item()
            .once()
            .withf(|id| *id == CartItemId::new(1))
            .return_once(|_| Ok(()));

        let mut confirmation = MockConfirmation::new();
        confirmation.expect_confirm().once().return_const(true);

        let store = loaded_store(api, vec![Vec::new()]).await?;
        let outcome = store
            .remove_item(CartItemId::new(1), &confirmation)
            .await?;

        assert_eq!(outcome, RemoveOutcome::Removed);
        assert!(store.snapshot().lines.is_empty());
        assert_eq!(store.subtotal(), Rupiah::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn failed_removal_keeps_line() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_remove_cart_item()
            .once()
            .return_once(|_| Err(server_error("Gagal menghapus item.")));

        let mut confirmation = MockConfirmation::new();
        confirmation.expect_confirm().once().return_const(true);

        let store = loaded_store(api, Vec::new()).await?;
        let result = store.remove_item(CartItemId::new(1), &confirmation).await;

        assert!(result.is_err(), "expected failure, got {result:?}");

        let snapshot = store.snapshot();

        assert_eq!(snapshot.lines.len(), 1);
        assert!(snapshot.lines.lines().iter().all(|line| line.is_idle()));
        assert_eq!(snapshot.notice.as_deref(), Some("Gagal menghapus item."));

        Ok(())
    }

    #[tokio::test]
    async fn removing_unknown_line_is_rejected() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_remove_cart_item().never();

        let mut confirmation = MockConfirmation::new();
        confirmation.expect_confirm().never();

        let store = loaded_store(api, Vec::new()).await?;
        let result = store.remove_item(CartItemId::new(99), &confirmation).await;

        assert!(
            matches!(
                result,
                Err(CartStoreError::Line(LineError::NotFound(_)))
            ),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_reloads_cart_for_every_subscriber() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_add_cart_item()
            .once()
            .withf(|item| item.product == ProductId::new(10) && item.quantity.get() == 3)
            .return_once(|_| Ok(()));

        let store = loaded_store(api, vec![urea_cart(5)]).await?;
        let mut updates = store.subscribe();
        updates.mark_unchanged();

        store
            .add(ProductId::new(10), Quantity::new(3).ok_or("zero")?)
            .await?;

        assert!(updates.has_changed()?);
        assert_eq!(updates.borrow_and_update().subtotal(), Rupiah::new(250_000));

        Ok(())
    }
}
