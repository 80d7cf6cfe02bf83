//! Locations service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::locations::{
        errors::LocationsServiceError,
        records::{AreaRecord, AreaUuid, CityRecord, CityUuid, DivisionRecord, DivisionUuid},
        repository::PgLocationsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgLocationsService {
    db: Db,
    repository: PgLocationsRepository,
}

impl PgLocationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLocationsRepository::new(),
        }
    }
}

fn clean_name(name: &str) -> Result<&str, LocationsServiceError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(LocationsServiceError::MissingRequiredData);
    }

    Ok(name)
}

#[async_trait]
impl LocationsService for PgLocationsService {
    async fn list_divisions(&self) -> Result<Vec<DivisionRecord>, LocationsServiceError> {
        let mut tx = self.db.begin().await?;

        let divisions = self.repository.list_divisions(&mut tx).await?;

        tx.commit().await?;

        Ok(divisions)
    }

    async fn list_cities(
        &self,
        division: DivisionUuid,
    ) -> Result<Vec<CityRecord>, LocationsServiceError> {
        let mut tx = self.db.begin().await?;

        let cities = self.repository.list_cities(&mut tx, division).await?;

        tx.commit().await?;

        Ok(cities)
    }

    async fn list_areas(&self, city: CityUuid) -> Result<Vec<AreaRecord>, LocationsServiceError> {
        let mut tx = self.db.begin().await?;

        let areas = self.repository.list_areas(&mut tx, city).await?;

        tx.commit().await?;

        Ok(areas)
    }

    #[tracing::instrument(name = "locations.service.create_division", skip(self), err)]
    async fn create_division(
        &self,
        division: DivisionUuid,
        name: &str,
    ) -> Result<DivisionRecord, LocationsServiceError> {
        let name = clean_name(name)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_division(&mut tx, division, name)
            .await?;

        tx.commit().await?;

        info!("created division");

        Ok(created)
    }

    #[tracing::instrument(name = "locations.service.create_city", skip(self), err)]
    async fn create_city(
        &self,
        city: CityUuid,
        division: DivisionUuid,
        name: &str,
    ) -> Result<CityRecord, LocationsServiceError> {
        let name = clean_name(name)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_city(&mut tx, city, division, name)
            .await?;

        tx.commit().await?;

        info!("created city");

        Ok(created)
    }

    #[tracing::instrument(name = "locations.service.create_area", skip(self), err)]
    async fn create_area(
        &self,
        area: AreaUuid,
        city: CityUuid,
        name: &str,
    ) -> Result<AreaRecord, LocationsServiceError> {
        let name = clean_name(name)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_area(&mut tx, area, city, name).await?;

        tx.commit().await?;

        info!("created area");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait LocationsService: Send + Sync {
    /// All divisions, by name.
    async fn list_divisions(&self) -> Result<Vec<DivisionRecord>, LocationsServiceError>;

    /// Cities within a division, by name. Empty for an unknown division.
    async fn list_cities(
        &self,
        division: DivisionUuid,
    ) -> Result<Vec<CityRecord>, LocationsServiceError>;

    /// Areas within a city, by name. Empty for an unknown city.
    async fn list_areas(&self, city: CityUuid) -> Result<Vec<AreaRecord>, LocationsServiceError>;

    async fn create_division(
        &self,
        division: DivisionUuid,
        name: &str,
    ) -> Result<DivisionRecord, LocationsServiceError>;

    async fn create_city(
        &self,
        city: CityUuid,
        division: DivisionUuid,
        name: &str,
    ) -> Result<CityRecord, LocationsServiceError>;

    async fn create_area(
        &self,
        area: AreaUuid,
        city: CityUuid,
        name: &str,
    ) -> Result<AreaRecord, LocationsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn cascading_lists_follow_parents() -> TestResult {
        let ctx = TestContext::new().await;

        let dhaka = ctx
            .locations
            .create_division(DivisionUuid::new(), "Dhaka")
            .await?;
        let khulna = ctx
            .locations
            .create_division(DivisionUuid::new(), "Khulna")
            .await?;

        let city = ctx
            .locations
            .create_city(CityUuid::new(), dhaka.uuid, "Dhaka City")
            .await?;
        ctx.locations
            .create_city(CityUuid::new(), khulna.uuid, "Jessore")
            .await?;

        ctx.locations
            .create_area(AreaUuid::new(), city.uuid, "Mirpur")
            .await?;
        ctx.locations
            .create_area(AreaUuid::new(), city.uuid, "Gulshan")
            .await?;

        let divisions = ctx.locations.list_divisions().await?;
        let cities = ctx.locations.list_cities(dhaka.uuid).await?;
        let areas = ctx.locations.list_areas(city.uuid).await?;

        let division_names: Vec<_> = divisions.iter().map(|d| d.name.as_str()).collect();
        let area_names: Vec<_> = areas.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(division_names, vec!["Dhaka", "Khulna"]);
        assert_eq!(cities, vec![city]);
        assert_eq!(area_names, vec!["Gulshan", "Mirpur"]);

        Ok(())
    }

    #[tokio::test]
    async fn city_under_unknown_division_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .locations
            .create_city(CityUuid::new(), DivisionUuid::new(), "Nowhere")
            .await;

        assert!(
            matches!(result, Err(LocationsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn blank_name_returns_missing_required_data() {
        let ctx = TestContext::new().await;

        let result = ctx.locations.create_division(DivisionUuid::new(), "  ").await;

        assert!(
            matches!(result, Err(LocationsServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_division_has_no_cities() -> TestResult {
        let ctx = TestContext::new().await;

        let cities = ctx.locations.list_cities(DivisionUuid::new()).await?;

        assert!(cities.is_empty());

        Ok(())
    }
}
