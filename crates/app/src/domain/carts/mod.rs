//! Carts
//!
//! A customer has at most one open (unpaid) cart. Lines are priced live from the catalog
//! every time the cart is read.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod summary;
pub mod totals;

pub use errors::CartsServiceError;
pub use service::*;
