//! Address Records

use crate::{
    accounts::records::CustomerUuid,
    domain::locations::records::{AreaUuid, CityUuid, DivisionUuid},
    uuids::TypedUuid,
};

/// Which of a customer's addresses a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Shipping,
    Billing,
}

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Address fields as entered at checkout, with resolved location references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDetails {
    pub address_line: String,
    pub division_uuid: DivisionUuid,
    pub city_uuid: CityUuid,
    pub area_uuid: AreaUuid,
    pub postal_code: Option<String>,
    pub phone_number: String,
}

/// Address Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub customer_uuid: CustomerUuid,
    pub details: AddressDetails,
}
