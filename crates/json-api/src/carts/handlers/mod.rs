//! Cart Handlers

pub(crate) mod apply_coupon;
pub(crate) mod count;
pub(crate) mod get;
