//! Tani
//!
//! Storefront domain model for the Tani agricultural-supplies shop: products
//! and categories, cart lines with local reconciliation state, checkout
//! validation and order snapshots, catalog filters synchronised with the URL
//! query string, and the backend's response envelopes.
//!
//! Nothing here performs I/O; the `tani-app` crate drives these types against
//! the REST backend.

pub mod cart;
pub mod catalog;
pub mod envelope;
pub mod ids;
pub mod orders;
pub mod pagination;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod users;

mod records;
