//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    accounts::errors::into_status_error, auth::middleware::extract_bearer_token, extensions::*,
    state::State,
};

/// Logout Handler
///
/// Revokes the session the request was authenticated with.
#[endpoint(
    tags("accounts"),
    summary = "Logout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Session revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "accounts.logout", skip(req, depot), err)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.customer_uuid_or_401()?;

    let token = extract_bearer_token(req).ok_or_else(StatusError::unauthorized)?;

    state
        .app
        .accounts
        .revoke_session(token)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::{http::header::AUTHORIZATION, test::TestClient};
    use storefront_app::accounts::MockAccountsService;
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn test_logout_revokes_the_presented_token() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_revoke_session()
            .once()
            .withf(|token| token == "sf_abc123")
            .return_once(|_| Ok(()));

        let service = Mocks {
            accounts,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("accounts/logout").post(handler));

        let res = TestClient::post("http://example.com/accounts/logout")
            .add_header(AUTHORIZATION, "Bearer sf_abc123", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
