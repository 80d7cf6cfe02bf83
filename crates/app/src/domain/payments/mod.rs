//! Online payments through a hosted gateway page

pub mod errors;
pub mod gateway;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod sslcommerz;

pub use errors::PaymentsServiceError;
pub use service::*;
