//! Product detail page

pub mod errors;
pub mod viewer;

pub use errors::DetailError;
pub use viewer::*;
