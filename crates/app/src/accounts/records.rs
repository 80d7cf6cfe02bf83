//! Account Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Customer Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub otp_code: Option<String>,
    pub otp_created_at: Option<Timestamp>,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

/// Session UUID
pub type SessionUuid = TypedUuid<SessionRecord>;

/// Marker for bearer sessions; only the token hash is persisted.
#[derive(Debug)]
pub struct SessionRecord;

/// Login attempt UUID
pub type LoginAttemptUuid = TypedUuid<LoginAttemptRecord>;

#[derive(Debug)]
pub struct LoginAttemptRecord;

/// A freshly issued bearer session. The raw token is only available here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub customer_uuid: CustomerUuid,
    pub token: String,
    pub expires_at: Timestamp,
}
