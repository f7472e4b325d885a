//! Storefront API service.

use async_trait::async_trait;
use mockall::automock;
use tani::{
    cart::{CartItem, CartItemId, NewCartItem, Quantity},
    catalog::ProductQuery,
    orders::{NewOrder, Order, OrderId},
    pagination::Paginated,
    products::Product,
    users::User,
};

use crate::api::errors::ApiError;

/// Operations the storefront performs against the backend.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /user`
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `GET /keranjang`
    async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError>;

    /// `POST /keranjang`
    async fn add_cart_item(&self, item: NewCartItem) -> Result<(), ApiError>;

    /// `PUT /keranjang/{id}`
    async fn update_cart_item(&self, id: CartItemId, quantity: Quantity) -> Result<(), ApiError>;

    /// `DELETE /keranjang/{id}`
    async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError>;

    /// `GET /pupuk`
    async fn list_products(&self, query: ProductQuery) -> Result<Paginated<Product>, ApiError>;

    /// `GET /pupuk/{slug}`
    async fn product(&self, slug: String) -> Result<Product, ApiError>;

    /// `POST /pesanan`
    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError>;

    /// `GET /pesanan/{id}`
    async fn order(&self, id: OrderId) -> Result<Order, ApiError>;
}
