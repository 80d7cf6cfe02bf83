//! Request Login Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_app::accounts::AccountsServiceError;

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OtpRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OtpRequestedResponse {
    pub message: String,
}

/// Request Login Code Handler
///
/// Emails a six digit code valid for five minutes. The response is the same whether or not
/// the email belongs to an account.
#[endpoint(
    tags("accounts"),
    summary = "Request Login Code",
    responses(
        (status_code = StatusCode::ACCEPTED, description = "Code sent if the account exists"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Email delivery failed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<OtpRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OtpRequestedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state
        .app
        .accounts
        .request_otp(&json.into_inner().email, Timestamp::now())
        .await
    {
        Ok(()) => {}
        Err(AccountsServiceError::NotFound) => info!("login code requested for unknown email"),
        Err(error) => return Err(into_status_error(error)),
    }

    res.status_code(StatusCode::ACCEPTED);

    Ok(Json(OtpRequestedResponse {
        message: "If an account exists for this email, a login code has been sent.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use storefront_app::accounts::{MockAccountsService, email::EmailError};
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks {
            accounts,
            ..Mocks::default()
        }
        .public_service(Router::with_path("accounts/otp").post(handler))
    }

    #[tokio::test]
    async fn test_known_and_unknown_emails_look_alike() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_request_otp()
            .once()
            .withf(|email, _| email == "known@example.com")
            .return_once(|_, _| Ok(()));

        accounts
            .expect_request_otp()
            .once()
            .withf(|email, _| email == "unknown@example.com")
            .return_once(|_, _| Err(AccountsServiceError::NotFound));

        let service = make_service(accounts);

        for email in ["known@example.com", "unknown@example.com"] {
            let res = TestClient::post("http://example.com/accounts/otp")
                .json(&json!({ "email": email }))
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::ACCEPTED), "for {email}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_failure_returns_502() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_request_otp().once().return_once(|_, _| {
            Err(AccountsServiceError::Email(EmailError::Delivery(
                "smtp unavailable".to_string(),
            )))
        });

        let res = TestClient::post("http://example.com/accounts/otp")
            .json(&json!({ "email": "known@example.com" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }
}
