//! Carts

mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use handlers::*;
