//! Storefront REST API

pub mod errors;
pub mod http;
pub mod service;

pub use errors::ApiError;
pub use http::HttpStorefrontApi;
pub use service::*;
