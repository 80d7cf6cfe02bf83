//! Account Handlers

pub(crate) mod logout;
pub(crate) mod register;
pub(crate) mod request_otp;
pub(crate) mod verify_otp;
