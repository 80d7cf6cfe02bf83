//! App Router

use salvo::Router;

use crate::{
    accounts, auth, carts, checkout, healthcheck, locations, observability, orders, payments,
};

/// Every API route. State and the request-wide hoops are added by the caller.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("accounts")
                .push(Router::with_path("register").post(accounts::register::handler))
                .push(
                    Router::with_path("otp")
                        .post(accounts::request_otp::handler)
                        .push(Router::with_path("verify").post(accounts::verify_otp::handler)),
                ),
        )
        .push(
            Router::with_path("locations")
                .push(
                    Router::with_path("divisions")
                        .get(locations::divisions::handler)
                        .push(
                            Router::with_path("{division}/cities")
                                .get(locations::cities::handler),
                        ),
                )
                .push(Router::with_path("cities/{city}/areas").get(locations::areas::handler)),
        )
        .push(
            Router::with_path("payments")
                .push(Router::with_path("success").post(payments::callback::success))
                .push(Router::with_path("fail").post(payments::callback::fail))
                .push(Router::with_path("cancel").post(payments::callback::cancel)),
        )
        .push(
            Router::with_path("cart/count")
                .hoop(auth::middleware::optional)
                .get(carts::count::handler),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("accounts/logout").post(accounts::logout::handler))
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .push(Router::with_path("coupon").post(carts::apply_coupon::handler))
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                )
                .push(Router::with_path("checkout").post(checkout::create::handler))
                .push(
                    Router::with_path("orders").get(orders::index::handler).push(
                        Router::with_path("{order}")
                            .get(orders::get::handler)
                            .push(Router::with_path("invoice").get(orders::invoice::handler))
                            .push(Router::with_path("payment").post(payments::start::handler)),
                    ),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use storefront_app::accounts::{AccountsServiceError, MockAccountsService};
    use testresult::TestResult;

    use crate::{carts::count::CartCountResponse, test_helpers::Mocks};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_healthcheck_is_public() -> TestResult {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_requires_a_bearer_token() -> TestResult {
        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_requires_a_bearer_token() -> TestResult {
        let res = TestClient::post("http://example.com/checkout")
            .json(&serde_json::json!({}))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_cart_count_is_zero() -> TestResult {
        let body: CartCountResponse = TestClient::get("http://example.com/cart/count")
            .send(&make_service(Mocks::default()))
            .await
            .take_json()
            .await?;

        assert_eq!(body.count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_count_rejects_unknown_session() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_authenticate_bearer()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::NotFound));

        let res = TestClient::get("http://example.com/cart/count")
            .add_header(AUTHORIZATION, "Bearer stale", true)
            .send(&make_service(Mocks {
                accounts,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
