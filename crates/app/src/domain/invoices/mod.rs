//! Invoices

pub mod errors;
pub(crate) mod generator;
pub mod number;
pub mod pdf;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::InvoicesServiceError;
pub use service::*;
