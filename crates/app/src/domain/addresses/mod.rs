//! Shipping and billing addresses
//!
//! Each customer keeps at most one of each; checkout overwrites them in place.

pub mod records;
pub(crate) mod repository;
