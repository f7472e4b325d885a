//! Payment instructions

pub mod errors;
pub mod uploader;
pub mod view;

pub use errors::PaymentError;
pub use uploader::*;
pub use view::*;
