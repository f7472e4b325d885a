//! Tani storefront client.
//!
//! Typed REST client for the shop backend, the shared cart store, and the
//! page controllers (catalog, product detail, checkout, payment) built on
//! top of them.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod detail;
pub mod feedback;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod payment;

#[cfg(test)]
mod test;
