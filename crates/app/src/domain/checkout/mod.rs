//! Checkout
//!
//! Turns the customer's open cart into an order in a single transaction.

pub mod errors;
pub mod form;
pub mod service;

pub use errors::CheckoutError;
pub use service::*;
