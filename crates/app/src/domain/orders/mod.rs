//! Orders

pub mod data;
pub mod errors;
pub mod number;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
