//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Delete Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.delete",
    skip(item, depot),
    fields(
        customer_uuid = tracing::field::Empty,
        item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer));
    span.record("item_uuid", tracing::field::display(item));

    state
        .app
        .carts
        .remove_item(customer, item.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(item_uuid = %item, "removed cart item");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use storefront_app::domain::carts::{
        CartsServiceError, MockCartsService, records::CartItemUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER_UUID};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        Mocks {
            carts,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("cart/items/{item}").delete(handler))
    }

    #[tokio::test]
    async fn test_item_is_removed() -> TestResult {
        let item = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |customer, u| *customer == TEST_CUSTOMER_UUID && *u == item)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/cart/items/{item}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_item_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/cart/items/{}", CartItemUuid::new()))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
