//! Orders and checkout validation

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::{CartItem, Quantity, subtotal},
    ids::TypedId,
    prices::Rupiah,
    products::ProductId,
    users::UserId,
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Order (`pesanan`), immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend id
    pub id: OrderId,

    /// Recipient name
    #[serde(rename = "nama_pelanggan", default)]
    pub customer_name: String,

    /// Contact phone
    #[serde(rename = "nomor_whatsapp", default)]
    pub phone: String,

    /// Shipping address
    #[serde(rename = "alamat_pengiriman", default)]
    pub shipping_address: String,

    /// Optional note
    #[serde(rename = "catatan", default)]
    pub note: Option<String>,

    /// Order date as sent by the server
    #[serde(rename = "tanggal_pesanan", default)]
    pub order_date: Option<String>,

    /// Item snapshots
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Total price
    #[serde(rename = "total_harga", default)]
    pub total: Rupiah,

    /// Server-side status, when reported
    #[serde(default)]
    pub status: Option<String>,
}

/// Product snapshot taken at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product id
    #[serde(rename = "pupuk_id")]
    pub product: ProductId,

    /// Units ordered
    #[serde(rename = "jumlah")]
    pub quantity: Quantity,

    /// Unit price at order time
    #[serde(rename = "harga_saat_pesanan")]
    pub unit_price: Rupiah,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.id,
            quantity: item.quantity,
            unit_price: item.product.price,
        }
    }
}

/// Shipping form filled in at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Recipient name
    pub recipient_name: String,

    /// Contact phone
    pub phone: String,

    /// Shipping address
    pub address: String,

    /// Optional note for the seller
    pub note: String,
}

impl ShippingDetails {
    /// Required fields that are blank after trimming.
    pub fn missing_fields(&self) -> SmallVec<[ShippingField; 3]> {
        [
            (ShippingField::RecipientName, &self.recipient_name),
            (ShippingField::Phone, &self.phone),
            (ShippingField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Set a single field.
    pub fn set(&mut self, field: ShippingField, value: impl Into<String>) {
        let value = value.into();

        match field {
            ShippingField::RecipientName => self.recipient_name = value,
            ShippingField::Phone => self.phone = value,
            ShippingField::Address => self.address = value,
            ShippingField::Note => self.note = value,
        }
    }
}

/// Shipping form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
    /// Recipient name
    RecipientName,

    /// Contact phone
    Phone,

    /// Shipping address
    Address,

    /// Note
    Note,
}

impl Display for ShippingField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::RecipientName => "recipient name",
            Self::Phone => "phone number",
            Self::Address => "shipping address",
            Self::Note => "note",
        })
    }
}

/// Checkout preconditions that failed before any request was made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutValidationError {
    /// Nothing to order
    #[error("your cart is empty")]
    EmptyCart,

    /// Required shipping fields left blank
    #[error("please fill in the {}", join_fields(.0))]
    MissingFields(SmallVec<[ShippingField; 3]>),
}

fn join_fields(fields: &[ShippingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Order-creation request body for `POST /pesanan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    /// Signed-in user, when known
    pub user_id: Option<UserId>,

    /// Recipient name
    #[serde(rename = "nama_pelanggan")]
    pub customer_name: String,

    /// Contact phone
    #[serde(rename = "nomor_whatsapp")]
    pub phone: String,

    /// Shipping address
    #[serde(rename = "alamat_pengiriman")]
    pub shipping_address: String,

    /// Note, empty when not given
    #[serde(rename = "catatan")]
    pub note: String,

    /// Order date, `YYYY-MM-DD`
    #[serde(rename = "tanggal_pesanan")]
    pub order_date: Date,

    /// Item snapshots
    pub items: Vec<OrderItem>,

    /// `Σ jumlah × harga_saat_pesanan`
    #[serde(rename = "total_harga")]
    pub total: Rupiah,
}

impl NewOrder {
    /// Snapshot the cart into an order request.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart is empty or a required shipping field
    /// is blank.
    pub fn from_cart(
        user: Option<UserId>,
        details: &ShippingDetails,
        items: &[CartItem],
        order_date: Date,
    ) -> Result<Self, CheckoutValidationError> {
        if items.is_empty() {
            return Err(CheckoutValidationError::EmptyCart);
        }

        let missing = details.missing_fields();

        if !missing.is_empty() {
            return Err(CheckoutValidationError::MissingFields(missing));
        }

        Ok(Self {
            user_id: user,
            customer_name: details.recipient_name.trim().to_string(),
            phone: details.phone.trim().to_string(),
            shipping_address: details.address.trim().to_string(),
            note: details.note.trim().to_string(),
            order_date,
            items: items.iter().map(OrderItem::from).collect(),
            total: subtotal(items),
        })
    }
}
