//! Payment instructions viewer
//!
//! Shows the order to pay for, where to transfer the money, and hands the
//! transfer receipt to a [`ProofUploader`].

use std::{sync::Arc, time::Duration};

use tani::{
    orders::{Order, OrderId},
    prices::Rupiah,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    api::StorefrontApi,
    lifecycle::Lifecycle,
    navigation::{Navigator, Route},
    payment::{
        errors::PaymentError,
        uploader::{PaymentProof, ProofUploader, UploadReceipt},
    },
};

const ORDER_FAILED: &str = "Could not load the order details. Make sure the order id is valid.";
const UPLOADED: &str = "Payment proof uploaded. An admin will verify it shortly.";

/// Account that accepts transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankAccount {
    pub bank: &'static str,
    pub number: &'static str,
    pub holder: &'static str,
}

pub const BANK_ACCOUNTS: [BankAccount; 2] = [
    BankAccount {
        bank: "BCA",
        number: "1234567890",
        holder: "PT Andika Tani Sejahtera",
    },
    BankAccount {
        bank: "Mandiri",
        number: "0987654321",
        holder: "PT Andika Tani Sejahtera",
    },
];

/// Time the customer has to upload a proof after ordering.
pub const UPLOAD_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Transfer instructions for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstructions {
    pub order: OrderId,
    pub amount: Rupiah,
    pub accounts: &'static [BankAccount],
    pub upload_window: Duration,
}

impl TransferInstructions {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order: order.id,
            amount: order.total,
            accounts: &BANK_ACCOUNTS,
            upload_window: UPLOAD_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentState {
    pub order: Option<Order>,
    pub loading: bool,
    pub error: Option<String>,

    /// Confirmation shown after a successful upload
    pub upload_message: Option<String>,
}

/// Payment page controller.
pub struct PaymentView {
    api: Arc<dyn StorefrontApi>,
    navigator: Arc<dyn Navigator>,
    lifecycle: Lifecycle,
    state: watch::Sender<PaymentState>,
}

impl PaymentView {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            lifecycle: Lifecycle::new(),
            state: watch::Sender::new(PaymentState::default()),
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    /// Show `id`, using the order carried by navigation when it matches and
    /// fetching it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the order has to be fetched and cannot be.
    pub async fn load(&self, id: OrderId, carried: Option<Order>) -> Result<(), PaymentError> {
        if let Some(order) = carried.filter(|order| order.id == id) {
            debug!(order = %id, "using carried order");

            self.state.send_modify(|state| {
                *state = PaymentState {
                    order: Some(order),
                    ..PaymentState::default()
                };
            });

            return Ok(());
        }

        self.state.send_modify(|state| {
            *state = PaymentState {
                loading: true,
                ..PaymentState::default()
            };
        });

        let result = self.api.order(id).await;

        if !self.lifecycle.is_mounted() {
            return Err(PaymentError::Unmounted);
        }

        match result {
            Ok(order) => {
                self.state.send_modify(|state| {
                    state.order = Some(order);
                    state.loading = false;
                });

                Ok(())
            }
            Err(error) => {
                warn!(order = %id, %error, "failed to load order");

                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(ORDER_FAILED.to_string());
                });

                Err(error.into())
            }
        }
    }

    /// Open the page for a [`Route::Payment`]; other routes are ignored.
    ///
    /// # Errors
    ///
    /// See [`PaymentView::load`].
    pub async fn open(&self, route: Route) -> Result<(), PaymentError> {
        match route {
            Route::Payment { order, carried } => self.load(order, carried.map(|order| *order)).await,
            _ => Ok(()),
        }
    }

    /// Transfer instructions for the loaded order.
    pub fn instructions(&self) -> Option<TransferInstructions> {
        self.state
            .borrow()
            .order
            .as_ref()
            .map(TransferInstructions::for_order)
    }

    /// Hand the transfer receipt to `uploader`. On success the confirmation
    /// is shown and the user moves on to the order list; a failure is only
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns an error when no order is loaded or the upload fails.
    pub async fn submit_proof(
        &self,
        uploader: &dyn ProofUploader,
        proof: PaymentProof,
    ) -> Result<UploadReceipt, PaymentError> {
        let order = self
            .state
            .borrow()
            .order
            .as_ref()
            .map(|order| order.id)
            .ok_or(PaymentError::NoOrder)?;

        match uploader.upload(order, proof).await {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| UPLOADED.to_string());

                info!(%order, "payment proof uploaded");

                self.state
                    .send_modify(|state| state.upload_message = Some(message));
                self.navigator.navigate(Route::Orders);

                Ok(receipt)
            }
            Err(error) => {
                warn!(%order, %error, "payment proof upload failed");

                Err(error.into())
            }
        }
    }
}
