//! Account Data

use crate::accounts::records::CustomerUuid;

/// New Customer Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
}
