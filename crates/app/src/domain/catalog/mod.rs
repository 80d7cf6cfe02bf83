//! Catalog

pub mod data;
pub mod errors;
pub mod pricing;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod variants;

pub use errors::CatalogServiceError;
pub use service::*;
