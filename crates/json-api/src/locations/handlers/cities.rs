//! List Cities Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    locations::{errors::into_status_error, handlers::LocationsResponse},
    state::State,
};

/// List Cities Handler
///
/// An unknown division has no cities.
#[endpoint(
    tags("locations"),
    summary = "List Cities in a Division",
    responses(
        (status_code = StatusCode::OK, description = "Cities by name"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    division: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LocationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cities = state
        .app
        .locations
        .list_cities(division.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(LocationsResponse::from_pairs(
        cities
            .into_iter()
            .map(|city| (city.uuid.into_uuid(), city.name)),
    )))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::locations::{
        MockLocationsService,
        records::{CityRecord, CityUuid, DivisionUuid},
    };
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(locations: MockLocationsService) -> Service {
        Mocks {
            locations,
            ..Mocks::default()
        }
        .public_service(Router::with_path("locations/divisions/{division}/cities").get(handler))
    }

    #[tokio::test]
    async fn test_cities_of_the_division_are_listed() -> TestResult {
        let division = DivisionUuid::new();
        let city = CityUuid::new();

        let mut locations = MockLocationsService::new();

        locations
            .expect_list_cities()
            .once()
            .with(eq(division))
            .return_once(move |_| {
                Ok(vec![CityRecord {
                    uuid: city,
                    division_uuid: division,
                    name: "Dhaka City".to_string(),
                }])
            });

        let mut res = TestClient::get(format!(
            "http://example.com/locations/divisions/{division}/cities"
        ))
        .send(&make_service(locations))
        .await;

        let body: LocationsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.locations.iter().map(|c| c.uuid).collect::<Vec<_>>(),
            vec![city.into_uuid()]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_division_is_rejected() -> TestResult {
        let mut locations = MockLocationsService::new();

        locations.expect_list_cities().never();

        let res = TestClient::get("http://example.com/locations/divisions/not-a-uuid/cities")
            .send(&make_service(locations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
