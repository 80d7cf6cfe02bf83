//! Verify Login Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::accounts::records::IssuedSession;

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// A bearer session. The token is shown once.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub customer_uuid: Uuid,
    pub token: String,
    pub expires_at: String,
}

impl From<IssuedSession> for SessionResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            customer_uuid: session.customer_uuid.into_uuid(),
            token: session.token,
            expires_at: session.expires_at.to_string(),
        }
    }
}

/// Verify Login Code Handler
///
/// Five failed attempts within fifteen minutes lock the email out until the window passes.
#[endpoint(
    tags("accounts"),
    summary = "Verify Login Code",
    responses(
        (status_code = StatusCode::OK, description = "Session issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired code"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too many failed attempts"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyOtpRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .accounts
        .verify_otp(&request.email, &request.code, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::accounts::{AccountsServiceError, MockAccountsService};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER_UUID};

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks {
            accounts,
            ..Mocks::default()
        }
        .public_service(Router::with_path("accounts/otp/verify").post(handler))
    }

    fn verify_request() -> serde_json::Value {
        json!({ "email": "rahim@example.com", "code": "123456" })
    }

    #[tokio::test]
    async fn test_valid_code_issues_session() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_verify_otp()
            .once()
            .withf(|email, code, _| email == "rahim@example.com" && code == "123456")
            .return_once(|_, _, now| {
                Ok(IssuedSession {
                    customer_uuid: TEST_CUSTOMER_UUID,
                    token: "sf_token".to_string(),
                    expires_at: now,
                })
            });

        let mut res = TestClient::post("http://example.com/accounts/otp/verify")
            .json(&verify_request())
            .send(&make_service(accounts))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.token, "sf_token");
        assert_eq!(body.customer_uuid, TEST_CUSTOMER_UUID.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_code_returns_401() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_verify_otp()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::InvalidOtp));

        let res = TestClient::post("http://example.com/accounts/otp/verify")
            .json(&verify_request())
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limited_returns_429() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_verify_otp()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::RateLimited));

        let res = TestClient::post("http://example.com/accounts/otp/verify")
            .json(&verify_request())
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::TOO_MANY_REQUESTS));

        Ok(())
    }
}
