//! Storefront domain: catalog, carts, checkout and everything after it.

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod invoices;
pub mod locations;
pub mod orders;
pub mod payments;
