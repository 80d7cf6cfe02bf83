//! One-time passcodes

use jiff::{SignedDuration, Timestamp};
use rand::Rng;

/// How long an issued code stays valid.
pub const OTP_VALIDITY: SignedDuration = SignedDuration::from_mins(5);

/// Failed verifications allowed per email inside [`ATTEMPT_WINDOW`].
pub const MAX_FAILED_ATTEMPTS: u64 = 5;

pub const ATTEMPT_WINDOW: SignedDuration = SignedDuration::from_mins(15);

/// A random six digit code.
#[must_use]
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999_u32).to_string()
}

/// Whether `submitted` matches the stored code and was issued within [`OTP_VALIDITY`].
///
/// Fails closed: missing code or creation time, or an unrepresentable expiry, is a mismatch.
#[must_use]
pub fn otp_matches(
    stored_code: Option<&str>,
    created_at: Option<Timestamp>,
    submitted: &str,
    now: Timestamp,
) -> bool {
    let (Some(stored_code), Some(created_at)) = (stored_code, created_at) else {
        return false;
    };

    if stored_code != submitted.trim() {
        return false;
    }

    created_at
        .checked_add(OTP_VALIDITY)
        .is_ok_and(|expires_at| now <= expires_at)
}
