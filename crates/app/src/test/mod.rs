//! Test Helpers

use std::collections::VecDeque;

use tani::{
    cart::{CartItem, CartItemId, Quantity},
    catalog::ProductQuery,
    orders::{Order, OrderId},
    pagination::{PageMeta, Paginated},
    prices::Rupiah,
    products::{Availability, Category, CategoryId, Product, ProductId},
    users::{User, UserId},
};

use crate::api::{ApiError, MockStorefrontApi};

pub(crate) fn product(id: u64, name: &str, price: u64) -> Product {
    Product {
        id: ProductId::new(id),
        slug: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        price: Rupiah::new(price),
        description: None,
        image_url: None,
        availability: Availability::Available,
        stock: Some(100),
        category: Some(Category {
            id: CategoryId::new(1),
            slug: "pupuk-kimia".to_string(),
            name: "Pupuk Kimia".to_string(),
        }),
    }
}

pub(crate) fn unavailable(mut product: Product) -> Product {
    product.availability = Availability::from_status("habis");
    product
}

pub(crate) fn cart_item(id: u64, product: Product, quantity: u32) -> CartItem {
    CartItem {
        id: CartItemId::new(id),
        product,
        quantity: Quantity::new(quantity).unwrap_or(Quantity::ONE),
    }
}

pub(crate) fn user(id: u64) -> User {
    User {
        id: UserId::new(id),
        name: Some("Budi Santoso".to_string()),
        phone: Some("081234567890".to_string()),
        email: Some("budi@example.com".to_string()),
    }
}

pub(crate) fn order(id: u64, total: u64) -> Order {
    Order {
        id: OrderId::new(id),
        customer_name: "Budi Santoso".to_string(),
        phone: "081234567890".to_string(),
        shipping_address: "Jl. Sawah 1, Klaten".to_string(),
        note: None,
        order_date: Some("2026-10-18".to_string()),
        items: Vec::new(),
        total: Rupiah::new(total),
        status: Some("pending".to_string()),
    }
}

pub(crate) fn page_of(products: Vec<Product>, current_page: u32, last_page: u32) -> Paginated<Product> {
    Paginated {
        data: products,
        meta: Some(PageMeta {
            current_page,
            last_page,
            per_page: Some(12),
            total: None,
            from: None,
            to: None,
            links: Vec::new(),
        }),
        links: None,
    }
}

pub(crate) fn unauthenticated() -> ApiError {
    ApiError::Unauthenticated {
        message: Some("Unauthenticated.".to_string()),
    }
}

pub(crate) fn not_found() -> ApiError {
    ApiError::NotFound { message: None }
}

pub(crate) fn server_error(message: &str) -> ApiError {
    ApiError::Server {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: Some(message.to_string()),
    }
}

pub(crate) fn is_catalog_page(query: &ProductQuery, page: u32) -> bool {
    query.page == Some(page) && query.kategori_slug.is_none()
}

/// Expect exactly one `GET /keranjang` per entry of `loads`, answered in order.
pub(crate) fn expect_cart_loads(
    api: &mut MockStorefrontApi,
    loads: impl IntoIterator<Item = Vec<CartItem>>,
) {
    let mut loads: VecDeque<_> = loads.into_iter().collect();

    api.expect_cart_items()
        .times(loads.len())
        .returning(move || Ok(loads.pop_front().unwrap_or_default()));
}
