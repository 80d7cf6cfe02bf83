//! Customer accounts and bearer sessions

pub mod data;
pub mod email;
mod errors;
pub mod otp;
pub mod records;
mod repository;
mod service;
pub mod token;

pub use errors::*;
pub use service::*;
