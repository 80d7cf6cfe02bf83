//! Locations Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::locations::records::{
    AreaRecord, AreaUuid, CityRecord, CityUuid, DivisionRecord, DivisionUuid,
};

const CREATE_DIVISION_SQL: &str = include_str!("sql/create_division.sql");
const CREATE_CITY_SQL: &str = include_str!("sql/create_city.sql");
const CREATE_AREA_SQL: &str = include_str!("sql/create_area.sql");
const LIST_DIVISIONS_SQL: &str = include_str!("sql/list_divisions.sql");
const LIST_CITIES_SQL: &str = include_str!("sql/list_cities.sql");
const LIST_AREAS_SQL: &str = include_str!("sql/list_areas.sql");
const GET_DIVISION_SQL: &str = include_str!("sql/get_division.sql");
const GET_CITY_SQL: &str = include_str!("sql/get_city.sql");
const GET_AREA_SQL: &str = include_str!("sql/get_area.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLocationsRepository;

impl PgLocationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_division(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        division: DivisionUuid,
        name: &str,
    ) -> Result<DivisionRecord, sqlx::Error> {
        query_as::<Postgres, DivisionRecord>(CREATE_DIVISION_SQL)
            .bind(division.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_city(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city: CityUuid,
        division: DivisionUuid,
        name: &str,
    ) -> Result<CityRecord, sqlx::Error> {
        query_as::<Postgres, CityRecord>(CREATE_CITY_SQL)
            .bind(city.into_uuid())
            .bind(division.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_area(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        area: AreaUuid,
        city: CityUuid,
        name: &str,
    ) -> Result<AreaRecord, sqlx::Error> {
        query_as::<Postgres, AreaRecord>(CREATE_AREA_SQL)
            .bind(area.into_uuid())
            .bind(city.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_divisions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<DivisionRecord>, sqlx::Error> {
        query_as::<Postgres, DivisionRecord>(LIST_DIVISIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_cities(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        division: DivisionUuid,
    ) -> Result<Vec<CityRecord>, sqlx::Error> {
        query_as::<Postgres, CityRecord>(LIST_CITIES_SQL)
            .bind(division.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_areas(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city: CityUuid,
    ) -> Result<Vec<AreaRecord>, sqlx::Error> {
        query_as::<Postgres, AreaRecord>(LIST_AREAS_SQL)
            .bind(city.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_division(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        division: DivisionUuid,
    ) -> Result<Option<DivisionRecord>, sqlx::Error> {
        query_as::<Postgres, DivisionRecord>(GET_DIVISION_SQL)
            .bind(division.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_city(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city: CityUuid,
    ) -> Result<Option<CityRecord>, sqlx::Error> {
        query_as::<Postgres, CityRecord>(GET_CITY_SQL)
            .bind(city.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_area(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        area: AreaUuid,
    ) -> Result<Option<AreaRecord>, sqlx::Error> {
        query_as::<Postgres, AreaRecord>(GET_AREA_SQL)
            .bind(area.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DivisionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DivisionUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CityRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CityUuid::from_uuid(row.try_get("uuid")?),
            division_uuid: DivisionUuid::from_uuid(row.try_get("division_uuid")?),
            name: row.try_get("name")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AreaRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AreaUuid::from_uuid(row.try_get("uuid")?),
            city_uuid: CityUuid::from_uuid(row.try_get("city_uuid")?),
            name: row.try_get("name")?,
        })
    }
}
