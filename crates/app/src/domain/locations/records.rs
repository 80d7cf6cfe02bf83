//! Location Records

use serde::Serialize;

use crate::uuids::TypedUuid;

/// Division UUID
pub type DivisionUuid = TypedUuid<DivisionRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionRecord {
    pub uuid: DivisionUuid,
    pub name: String,
}

/// City UUID
pub type CityUuid = TypedUuid<CityRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityRecord {
    pub uuid: CityUuid,
    pub division_uuid: DivisionUuid,
    pub name: String,
}

/// Area UUID
pub type AreaUuid = TypedUuid<AreaRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaRecord {
    pub uuid: AreaUuid,
    pub city_uuid: CityUuid,
    pub name: String,
}
