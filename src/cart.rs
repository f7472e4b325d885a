//! Cart
//!
//! Cart items as the backend reports them, plus [`CartLines`], the local
//! reconciliation state kept on top of them. A quantity change is applied
//! tentatively and the line is marked pending; the next server snapshot
//! replaces it, or [`CartLines::rollback`] restores the last quantity the
//! server confirmed.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::TypedId, prices::Rupiah, products::Product, products::ProductId};

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// Item quantity, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Quantity from a raw count, `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Clamp any requested count into the valid range.
    pub fn clamped(requested: i64) -> Self {
        let value = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);

        Self::new(value).unwrap_or(Self::ONE)
    }

    /// Step by `delta`, never dropping below one.
    #[must_use]
    pub fn stepped(self, delta: i64) -> Self {
        Self::clamped(i64::from(self.get()).saturating_add(delta))
    }

    /// Raw count
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

/// Cart Item (`keranjang` row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Backend id
    pub id: CartItemId,

    /// Referenced product
    #[serde(rename = "pupuk")]
    pub product: Product,

    /// Units in the cart
    pub quantity: Quantity,
}

impl CartItem {
    /// `quantity × unit price`
    pub fn line_total(&self) -> Rupiah {
        self.product.price.times(self.quantity.get())
    }
}

/// Add-to-cart request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartItem {
    /// Product to add
    #[serde(rename = "pupuk_id")]
    pub product: ProductId,

    /// Units to add
    pub quantity: Quantity,
}

/// Sum of `quantity × unit price` over `items`.
pub fn subtotal<'a>(items: impl IntoIterator<Item = &'a CartItem>) -> Rupiah {
    items.into_iter().map(CartItem::line_total).sum()
}

/// Pending marker for a line with a request in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineState {
    /// No request in flight; controls enabled
    #[default]
    Idle,

    /// Quantity update in flight
    Updating,

    /// Removal in flight
    Removing,
}

/// A cart item with its reconciliation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Item as currently displayed (possibly tentative)
    pub item: CartItem,

    /// Pending marker
    pub state: LineState,

    confirmed: Quantity,
}

impl CartLine {
    fn from_server(item: CartItem) -> Self {
        Self {
            confirmed: item.quantity,
            item,
            state: LineState::Idle,
        }
    }

    /// Last quantity the server confirmed.
    pub fn confirmed_quantity(&self) -> Quantity {
        self.confirmed
    }

    /// Whether the line's controls should be enabled.
    pub fn is_idle(&self) -> bool {
        self.state == LineState::Idle
    }
}

/// Result of starting a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The clamped quantity equals the current one; nothing to send
    Unchanged,

    /// Tentatively applied; send this quantity to the server
    Pending(Quantity),
}

/// Errors raised by line transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// No line with this id
    #[error("cart item {0} not found")]
    NotFound(CartItemId),

    /// The line is already being updated or removed
    #[error("cart item {0} already has a request in flight")]
    Busy(CartItemId),
}

/// Ordered cart lines with reconciliation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLines {
    lines: Vec<CartLine>,
}

impl CartLines {
    /// Lines built from a fresh server snapshot.
    pub fn from_server(items: Vec<CartItem>) -> Self {
        Self {
            lines: items.into_iter().map(CartLine::from_server).collect(),
        }
    }

    /// Replace every line with server truth, keeping pending markers of
    /// lines that are still present.
    pub fn replace_with_server(&mut self, items: Vec<CartItem>) {
        let previous = std::mem::take(&mut self.lines);

        self.lines = items
            .into_iter()
            .map(|item| {
                let state = previous
                    .iter()
                    .find(|line| line.item.id == item.id)
                    .map_or(LineState::Idle, |line| line.state);

                CartLine {
                    state,
                    ..CartLine::from_server(item)
                }
            })
            .collect();
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Items as currently displayed.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.lines.iter().map(|line| &line.item)
    }

    /// Line for `id`
    pub fn get(&self, id: CartItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id == id)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether every line matches what the server last confirmed, with no
    /// request in flight.
    pub fn is_settled(&self) -> bool {
        self.lines.iter().all(CartLine::is_idle)
    }

    /// Subtotal of the displayed quantities.
    pub fn subtotal(&self) -> Rupiah {
        subtotal(self.items())
    }

    /// Clamp `requested`, and when it differs from the current quantity apply
    /// it tentatively and mark the line as updating.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is unknown or already pending.
    pub fn begin_update(
        &mut self,
        id: CartItemId,
        requested: i64,
    ) -> Result<QuantityChange, LineError> {
        let line = self.idle_line_mut(id)?;
        let quantity = Quantity::clamped(requested);

        if line.item.quantity == quantity {
            return Ok(QuantityChange::Unchanged);
        }

        line.item.quantity = quantity;
        line.state = LineState::Updating;

        Ok(QuantityChange::Pending(quantity))
    }

    /// Mark the line as being removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is unknown or already pending.
    pub fn begin_remove(&mut self, id: CartItemId) -> Result<(), LineError> {
        self.idle_line_mut(id)?.state = LineState::Removing;

        Ok(())
    }

    /// Accept the displayed quantity as server-confirmed and clear the marker.
    pub fn confirm(&mut self, id: CartItemId) {
        if let Some(line) = self.line_mut(id) {
            line.confirmed = line.item.quantity;
            line.state = LineState::Idle;
        }
    }

    /// Restore the last confirmed quantity and clear the marker.
    pub fn rollback(&mut self, id: CartItemId) {
        if let Some(line) = self.line_mut(id) {
            line.item.quantity = line.confirmed;
            line.state = LineState::Idle;
        }
    }

    /// Drop the line locally.
    pub fn remove(&mut self, id: CartItemId) {
        self.lines.retain(|line| line.item.id != id);
    }

    fn line_mut(&mut self, id: CartItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item.id == id)
    }

    fn idle_line_mut(&mut self, id: CartItemId) -> Result<&mut CartLine, LineError> {
        let line = self.line_mut(id).ok_or(LineError::NotFound(id))?;

        if !line.is_idle() {
            return Err(LineError::Busy(id));
        }

        Ok(line)
    }
}
