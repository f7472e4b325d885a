//! Tani prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CartItem, CartItemId, CartLine, CartLines, LineError, LineState, NewCartItem, Quantity,
        QuantityChange, subtotal,
    },
    catalog::{
        CatalogFilters, CatalogLocation, DEFAULT_PER_PAGE, FEATURED_LIMIT, FilterChange,
        ProductQuery, SortKey,
    },
    envelope::{Data, ErrorBody, FieldErrors, ListBody, UserBody},
    ids::TypedId,
    orders::{
        CheckoutValidationError, NewOrder, Order, OrderId, OrderItem, ShippingDetails,
        ShippingField,
    },
    pagination::{LinkKind, PageLink, PageMeta, PageSlot, Paginated, page_window},
    prices::Rupiah,
    products::{Availability, Category, CategoryId, Product, ProductId},
    users::{User, UserId},
};
