//! Storefront domain services and persistence.

pub mod accounts;
pub mod context;
pub mod database;
pub mod domain;
pub mod money;
pub mod settings;

#[cfg(test)]
mod test;

mod uuids;
