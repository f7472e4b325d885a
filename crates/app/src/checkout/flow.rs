//! Checkout flow
//!
//! Loads the signed-in user and the cart, collects shipping details and turns
//! the cart into an order. Validation happens before anything is sent; a
//! single in-flight flag keeps a second click from placing a second order
//! while the first request is pending.

use std::sync::Arc;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use tani::{
    orders::{NewOrder, Order, ShippingDetails, ShippingField},
    prices::Rupiah,
    users::User,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    api::StorefrontApi,
    cart::CartStore,
    checkout::errors::CheckoutError,
    lifecycle::{InFlight, Lifecycle},
    navigation::{Navigator, Route},
};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const CART_FAILED: &str = "Could not load the cart. Please reload the page.";
const ORDER_FAILED: &str = "An error occurred while creating the order.";
const CART_BUSY: &str = "Please wait until the cart has finished updating.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutState {
    pub user: Option<User>,
    pub details: ShippingDetails,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

/// Checkout page controller.
pub struct CheckoutFlow {
    api: Arc<dyn StorefrontApi>,
    cart: Arc<CartStore>,
    navigator: Arc<dyn Navigator>,
    lifecycle: Lifecycle,
    submitting: InFlight,
    state: watch::Sender<CheckoutState>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        cart: Arc<CartStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            cart,
            navigator,
            lifecycle: Lifecycle::new(),
            submitting: InFlight::default(),
            state: watch::Sender::new(CheckoutState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    /// Total of the cart as it will be ordered.
    pub fn total(&self) -> Rupiah {
        self.cart.subtotal()
    }

    /// Fetch the current user and the cart concurrently. An unauthenticated
    /// user is sent to the login page; the recipient name and phone are
    /// prefilled from the user otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the user must log in or the cart cannot be
    /// loaded.
    pub async fn load(&self) -> Result<(), CheckoutError> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.user = None;
        });

        let (user, cart) = tokio::join!(self.api.current_user(), self.cart.refresh());

        if !self.lifecycle.is_mounted() {
            return Err(CheckoutError::Unmounted);
        }

        let user = match user {
            Ok(user) => Some(user),
            Err(error) if error.is_unauthenticated() => {
                self.state.send_modify(|state| state.loading = false);
                self.navigator.navigate(Route::Login);

                return Err(CheckoutError::LoginRequired);
            }
            Err(error) => {
                warn!(%error, "failed to load current user");

                None
            }
        };

        let cart_error = cart.err();

        if let Some(error) = &cart_error {
            warn!(%error, "failed to load cart for checkout");
        }

        self.state.send_modify(|state| {
            if let Some(user) = &user {
                state.details.recipient_name = user.name.clone().unwrap_or_default();
                state.details.phone = user.phone.clone().unwrap_or_default();
            }

            state.user = user;
            state.loading = false;
            state.error = cart_error.as_ref().map(|error| {
                if error.is_login_required() {
                    SESSION_EXPIRED.to_string()
                } else {
                    CART_FAILED.to_string()
                }
            });
        });

        cart_error.map_or(Ok(()), |error| Err(CheckoutError::Cart(error)))
    }

    /// Edit one shipping field.
    pub fn set_field(&self, field: ShippingField, value: impl Into<String>) {
        let value = value.into();

        self.state
            .send_modify(|state| state.details.set(field, value));
    }

    /// Place the order dated today (UTC).
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::submit_on`].
    pub async fn submit(&self) -> Result<Order, CheckoutError> {
        let today = Timestamp::now().to_zoned(TimeZone::UTC).date();

        self.submit_on(today).await
    }

    /// Place the order with the given order date. On success the local cart
    /// is cleared and the user is sent to the payment page carrying the new
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error when an order is already in flight, a cart line is
    /// still pending, the cart is empty, a required field is blank, or the
    /// server rejects the order.
    pub async fn submit_on(&self, order_date: Date) -> Result<Order, CheckoutError> {
        let _submitting = self
            .submitting
            .try_claim()
            .ok_or(CheckoutError::AlreadySubmitting)?;

        let (user, details) = {
            let state = self.state.borrow();

            (state.user.as_ref().map(|user| user.id), state.details.clone())
        };

        let cart = self.cart.snapshot();

        if !cart.lines.is_settled() {
            self.state
                .send_modify(|state| state.error = Some(CART_BUSY.to_string()));

            return Err(CheckoutError::CartBusy);
        }

        let items = cart.items();

        let request = match NewOrder::from_cart(user, &details, &items, order_date) {
            Ok(request) => request,
            Err(error) => {
                self.state
                    .send_modify(|state| state.error = Some(error.to_string()));

                return Err(error.into());
            }
        };

        self.state.send_modify(|state| {
            state.submitting = true;
            state.error = None;
        });

        let result = self.api.create_order(request).await;

        self.state.send_modify(|state| state.submitting = false);

        match result {
            Ok(order) => {
                info!(order = %order.id, total = %order.total, "order created");

                self.cart.clear_local();
                self.navigator.navigate(Route::payment_for(order.clone()));

                Ok(order)
            }
            Err(error) => {
                warn!(%error, "order creation failed");

                let message = error.detailed_message(ORDER_FAILED);

                self.state.send_modify(|state| state.error = Some(message));

                Err(CheckoutError::Api(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tani::{
        cart::{CartItem, CartItemId, NewCartItem, Quantity},
        catalog::ProductQuery,
        orders::{CheckoutValidationError, OrderId},
        pagination::Paginated,
        products::Product,
        users::UserId,
    };
    use testresult::TestResult;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        api::{ApiError, MockStorefrontApi},
        navigation::MockNavigator,
        test::{cart_item, expect_cart_loads, order, product, server_error, unauthenticated, user},
    };

    /// Delegates to `inner`, holding every `PUT /keranjang/{id}` until
    /// `release` is notified.
    struct HeldUpdates {
        inner: MockStorefrontApi,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl StorefrontApi for HeldUpdates {
        async fn current_user(&self) -> Result<User, ApiError> {
            self.inner.current_user().await
        }

        async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
            self.inner.cart_items().await
        }

        async fn add_cart_item(&self, item: NewCartItem) -> Result<(), ApiError> {
            self.inner.add_cart_item(item).await
        }

        async fn update_cart_item(
            &self,
            id: CartItemId,
            quantity: Quantity,
        ) -> Result<(), ApiError> {
            self.release.notified().await;
            self.inner.update_cart_item(id, quantity).await
        }

        async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
            self.inner.remove_cart_item(id).await
        }

        async fn list_products(
            &self,
            query: ProductQuery,
        ) -> Result<Paginated<Product>, ApiError> {
            self.inner.list_products(query).await
        }

        async fn product(&self, slug: String) -> Result<Product, ApiError> {
            self.inner.product(slug).await
        }

        async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError> {
            self.inner.create_order(order).await
        }

        async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
            self.inner.order(id).await
        }
    }

    fn urea_cart() -> Vec<tani::cart::CartItem> {
        vec![
            cart_item(1, product(10, "Urea", 50_000), 2),
            cart_item(2, product(11, "NPK Mutiara", 120_000), 1),
        ]
    }

    fn flow(api: MockStorefrontApi, navigator: MockNavigator) -> CheckoutFlow {
        let api = Arc::new(api);

        CheckoutFlow::new(
            api.clone(),
            Arc::new(CartStore::new(api)),
            Arc::new(navigator),
        )
    }

    fn october_18() -> Date {
        jiff::civil::date(2026, 10, 18)
    }

    #[tokio::test]
    async fn load_prefills_contact_from_user() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [urea_cart()]);

        let checkout = flow(api, MockNavigator::new());
        checkout.load().await?;

        let state = checkout.state();

        assert_eq!(state.details.recipient_name, "Budi Santoso");
        assert_eq!(state.details.phone, "081234567890");
        assert_eq!(checkout.total(), Rupiah::new(220_000));

        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_user_goes_to_login() {
        let mut api = MockStorefrontApi::new();
        let mut navigator = MockNavigator::new();

        api.expect_current_user()
            .once()
            .return_once(|| Err(unauthenticated()));
        expect_cart_loads(&mut api, [urea_cart()]);
        navigator
            .expect_navigate()
            .once()
            .withf(|route| *route == Route::Login)
            .return_const(());

        let result = flow(api, navigator).load().await;

        assert!(
            matches!(result, Err(CheckoutError::LoginRequired)),
            "expected LoginRequired, got {result:?}"
        );
    }

    #[tokio::test]
    async fn expired_cart_session_is_reported() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        api.expect_cart_items()
            .once()
            .return_once(|| Err(unauthenticated()));

        let checkout = flow(api, MockNavigator::new());
        let result = checkout.load().await;

        assert!(
            matches!(result, Err(CheckoutError::Cart(_))),
            "expected Cart, got {result:?}"
        );
        assert_eq!(checkout.state().error.as_deref(), Some(SESSION_EXPIRED));
    }

    #[tokio::test]
    async fn blank_address_sends_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut navigator = MockNavigator::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [urea_cart()]);
        api.expect_create_order().never();
        navigator.expect_navigate().never();

        let checkout = flow(api, navigator);
        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "   ");

        let result = checkout.submit_on(october_18()).await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::Validation(
                    CheckoutValidationError::MissingFields(_)
                ))
            ),
            "expected MissingFields, got {result:?}"
        );
        assert_eq!(
            checkout.state().error.as_deref(),
            Some("please fill in the shipping address")
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_sends_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [Vec::new()]);
        api.expect_create_order().never();

        let checkout = flow(api, MockNavigator::new());
        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "Jl. Sawah 1, Klaten");

        let result = checkout.submit_on(october_18()).await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::Validation(CheckoutValidationError::EmptyCart))
            ),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn successful_order_clears_cart_and_opens_payment() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut navigator = MockNavigator::new();
        let sent = Arc::new(Mutex::new(None));

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [urea_cart()]);
        api.expect_create_order().once().return_once({
            let sent = sent.clone();
            move |request| {
                if let Ok(mut sent) = sent.lock() {
                    *sent = Some(request);
                }

                Ok(order(31, 220_000))
            }
        });
        navigator
            .expect_navigate()
            .once()
            .withf(|route| {
                matches!(
                    route,
                    Route::Payment { order, carried: Some(carried) }
                        if order.get() == 31 && carried.total == Rupiah::new(220_000)
                )
            })
            .return_const(());

        let checkout = flow(api, navigator);
        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "Jl. Sawah 1, Klaten");
        checkout.set_field(ShippingField::Note, "Kirim pagi");

        let created = checkout.submit_on(october_18()).await?;

        assert_eq!(created.id.get(), 31);
        assert_eq!(checkout.total(), Rupiah::ZERO);
        assert!(!checkout.state().submitting);

        let request = sent
            .lock()
            .map_err(|error| error.to_string())?
            .clone()
            .ok_or("no order sent")?;

        assert_eq!(request.user_id, Some(UserId::new(9)));
        assert_eq!(request.shipping_address, "Jl. Sawah 1, Klaten");
        assert_eq!(request.note, "Kirim pagi");
        assert_eq!(request.order_date, october_18());
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.total, Rupiah::new(220_000));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_order_shows_server_details() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut navigator = MockNavigator::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [urea_cart()]);
        api.expect_create_order().once().return_once(|_| {
            Err(ApiError::from_response(
                reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                br#"{"message":"Data tidak valid.","errors":{"items.0.jumlah":["Stok tidak cukup."]}}"#,
            ))
        });
        navigator.expect_navigate().never();

        let checkout = flow(api, navigator);
        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "Jl. Sawah 1, Klaten");

        let result = checkout.submit_on(october_18()).await;

        assert!(
            matches!(result, Err(CheckoutError::Api(_))),
            "expected Api, got {result:?}"
        );
        assert_eq!(
            checkout.state().error.as_deref(),
            Some("Data tidak valid.\n\nDetail:\nStok tidak cukup.")
        );
        assert_eq!(checkout.total(), Rupiah::new(220_000));

        Ok(())
    }

    #[tokio::test]
    async fn rejection_without_message_leads_with_fallback() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut api, [urea_cart()]);
        api.expect_create_order().once().return_once(|_| {
            Err(ApiError::from_response(
                reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                br#"{"errors":{"nomor_whatsapp":["Nomor wajib diisi."]}}"#,
            ))
        });

        let checkout = flow(api, MockNavigator::new());
        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "Jl. Sawah 1, Klaten");

        let result = checkout.submit_on(october_18()).await;

        assert!(result.is_err(), "expected the order to be rejected");
        assert_eq!(
            checkout.state().error,
            Some(format!("{ORDER_FAILED}\n\nDetail:\nNomor wajib diisi."))
        );

        Ok(())
    }

    #[tokio::test]
    async fn pending_quantity_change_blocks_submission() -> TestResult {
        let mut inner = MockStorefrontApi::new();
        let mut navigator = MockNavigator::new();
        let release = Arc::new(Notify::new());

        inner
            .expect_current_user()
            .once()
            .return_once(|| Ok(user(9)));
        expect_cart_loads(&mut inner, [urea_cart()]);
        inner
            .expect_update_cart_item()
            .once()
            .withf(|id, quantity| id.get() == 1 && quantity.get() == 99)
            .return_once(|_, _| Err(server_error("Stok tidak cukup.")));
        inner
            .expect_create_order()
            .once()
            .withf(|request| {
                request.items.first().map(|item| item.quantity.get()) == Some(2)
                    && request.total == Rupiah::new(220_000)
            })
            .return_once(|_| Ok(order(31, 220_000)));
        navigator.expect_navigate().once().return_const(());

        let api = Arc::new(HeldUpdates {
            inner,
            release: release.clone(),
        });
        let cart = Arc::new(CartStore::new(api.clone()));
        let checkout = CheckoutFlow::new(api, cart.clone(), Arc::new(navigator));

        checkout.load().await?;
        checkout.set_field(ShippingField::Address, "Jl. Sawah 1, Klaten");

        let update = tokio::spawn({
            let cart = cart.clone();
            async move { cart.update_quantity(CartItemId::new(1), 99).await }
        });

        cart.subscribe()
            .wait_for(|snapshot| !snapshot.lines.is_settled())
            .await?;

        let blocked = checkout.submit_on(october_18()).await;

        assert!(
            matches!(blocked, Err(CheckoutError::CartBusy)),
            "expected CartBusy, got {blocked:?}"
        );
        assert_eq!(checkout.state().error.as_deref(), Some(CART_BUSY));

        release.notify_one();

        let rejected = update.await?;

        assert!(rejected.is_err(), "expected the update to fail");
        assert_eq!(checkout.total(), Rupiah::new(220_000));

        let created = checkout.submit_on(october_18()).await?;

        assert_eq!(created.id.get(), 31);

        Ok(())
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_rejected() {
        let mut api = MockStorefrontApi::new();
        api.expect_create_order().never();

        let checkout = flow(api, MockNavigator::new());
        let _pending = checkout.submitting.try_claim();

        let result = checkout.submit_on(october_18()).await;

        assert!(
            matches!(result, Err(CheckoutError::AlreadySubmitting)),
            "expected AlreadySubmitting, got {result:?}"
        );
    }
}
