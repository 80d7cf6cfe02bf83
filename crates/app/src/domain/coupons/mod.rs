//! Coupons

pub mod data;
pub mod errors;
pub mod instant;
pub mod records;
pub(crate) mod repository;
pub mod rules;
pub mod service;

pub use errors::CouponsServiceError;
pub use service::*;
