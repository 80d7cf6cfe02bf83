//! List Divisions Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    locations::{errors::into_status_error, handlers::LocationsResponse},
    state::State,
};

/// List Divisions Handler
#[endpoint(
    tags("locations"),
    summary = "List Divisions",
    responses(
        (status_code = StatusCode::OK, description = "Divisions by name"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<LocationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let divisions = state
        .app
        .locations
        .list_divisions()
        .await
        .map_err(into_status_error)?;

    Ok(Json(LocationsResponse::from_pairs(
        divisions
            .into_iter()
            .map(|division| (division.uuid.into_uuid(), division.name)),
    )))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::locations::{
        LocationsServiceError, MockLocationsService,
        records::{DivisionRecord, DivisionUuid},
    };
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(locations: MockLocationsService) -> Service {
        Mocks {
            locations,
            ..Mocks::default()
        }
        .public_service(Router::with_path("locations/divisions").get(handler))
    }

    #[tokio::test]
    async fn test_divisions_are_listed() -> TestResult {
        let dhaka = DivisionUuid::new();

        let mut locations = MockLocationsService::new();

        locations.expect_list_divisions().once().return_once(move || {
            Ok(vec![DivisionRecord {
                uuid: dhaka,
                name: "Dhaka".to_string(),
            }])
        });

        let mut res = TestClient::get("http://example.com/locations/divisions")
            .send(&make_service(locations))
            .await;

        let body: LocationsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.locations.len(), 1);
        assert_eq!(
            body.locations
                .first()
                .map(|division| (division.uuid, division.name.as_str())),
            Some((dhaka.into_uuid(), "Dhaka"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() -> TestResult {
        let mut locations = MockLocationsService::new();

        locations
            .expect_list_divisions()
            .once()
            .return_once(|| Err(LocationsServiceError::Sql(sqlx::Error::PoolClosed)));

        let res = TestClient::get("http://example.com/locations/divisions")
            .send(&make_service(locations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
