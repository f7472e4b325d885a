//! Catalog

pub mod browser;
pub mod debounce;
pub mod errors;
pub mod featured;
pub mod quick_add;

pub use browser::*;
pub use debounce::Debouncer;
pub use errors::{CatalogError, QuickAddError};
pub use featured::featured_products;
pub use quick_add::QuickAdd;
