//! Auth middleware.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use storefront_app::accounts::{AccountsServiceError, records::CustomerUuid};
use tracing::error;

use crate::{extensions::*, state::State};

/// Rejects the request unless it carries a live bearer session.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    match authenticate(depot, token).await {
        Ok(customer) => {
            depot.insert_customer_uuid(customer);

            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();
        }
    }
}

/// Authenticates the request when it carries a bearer token and lets anonymous requests
/// through.
#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.headers().contains_key(AUTHORIZATION) {
        let Some(token) = extract_bearer_token(req) else {
            res.render(StatusError::unauthorized().brief("Invalid Authorization header"));
            ctrl.skip_rest();

            return;
        };

        match authenticate(depot, token).await {
            Ok(customer) => depot.insert_customer_uuid(customer),
            Err(status) => {
                res.render(status);
                ctrl.skip_rest();

                return;
            }
        }
    }

    ctrl.call_next(req, depot, res).await;
}

async fn authenticate(depot: &Depot, token: &str) -> Result<CustomerUuid, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state
        .app
        .accounts
        .authenticate_bearer(token, Timestamp::now())
        .await
    {
        Ok(customer) => Ok(customer),
        Err(AccountsServiceError::NotFound) => {
            Err(StatusError::unauthorized().brief("Invalid or expired session"))
        }
        Err(source) => {
            error!("failed to authenticate session: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

pub(crate) fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use storefront_app::accounts::MockAccountsService;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::Mocks;

    use super::*;

    #[salvo::handler]
    async fn echo_customer(depot: &mut Depot, res: &mut Response) {
        let customer = depot
            .customer_uuid()
            .map_or_else(|| "anonymous".to_string(), |uuid| uuid.to_string());

        res.render(customer);
    }

    fn make_service(accounts: MockAccountsService, middleware: impl Handler) -> Service {
        let state = Mocks {
            accounts,
            ..Mocks::default()
        }
        .into_state();

        let router = Router::new()
            .hoop(inject(state))
            .hoop(middleware)
            .push(Router::new().get(echo_customer));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(accounts, handler))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(accounts, handler))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_session_returns_401() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_authenticate_bearer()
            .once()
            .withf(|token, _| token == "sf_abc123")
            .return_once(|_, _| Err(AccountsServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer sf_abc123", true)
            .send(&make_service(accounts, handler))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_session_injects_customer_uuid() -> TestResult {
        let customer = CustomerUuid::from_uuid(Uuid::nil());

        let mut accounts = MockAccountsService::new();

        accounts
            .expect_authenticate_bearer()
            .once()
            .withf(|token, _| token == "sf_abc123")
            .return_once(move |_, _| Ok(customer));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer sf_abc123", true)
            .send(&make_service(accounts, handler))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, customer.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_auth_lets_anonymous_requests_through() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com")
            .send(&make_service(accounts, optional))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "anonymous");

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_auth_rejects_unknown_session() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_authenticate_bearer()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer sf_stale", true)
            .send(&make_service(accounts, optional))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
