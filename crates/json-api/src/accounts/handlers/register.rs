//! Register Customer Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::accounts::{data::NewCustomer, records::CustomerUuid};

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

/// Register Customer Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub name: String,
    pub email: String,

    #[serde(default)]
    pub phone_number: Option<String>,
}

impl From<RegisterRequest> for NewCustomer {
    fn from(request: RegisterRequest) -> Self {
        NewCustomer {
            uuid: CustomerUuid::new(),
            name: request.name,
            email: request.email,
            phone_number: request.phone_number,
        }
    }
}

/// Customer Registered Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisteredResponse {
    pub uuid: Uuid,

    /// Email as stored, trimmed and lowercased
    pub email: String,
}

/// Register Customer Handler
///
/// Creates the customer and their profile. Sign in afterwards with a one-time code.
#[endpoint(
    tags("accounts"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Customer registered"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RegisteredResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let customer = state
        .app
        .accounts
        .register_customer(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(RegisteredResponse {
        uuid: customer.uuid.into_uuid(),
        email: customer.email,
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::accounts::{
        AccountsServiceError, MockAccountsService, records::CustomerRecord,
    };
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(accounts: MockAccountsService) -> Service {
        Mocks {
            accounts,
            ..Mocks::default()
        }
        .public_service(Router::with_path("accounts/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_201() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_register_customer()
            .once()
            .withf(|customer| customer.name == "Rahim" && customer.phone_number.is_none())
            .return_once(|customer| {
                Ok(CustomerRecord {
                    uuid: customer.uuid,
                    name: customer.name,
                    email: "rahim@example.com".to_string(),
                    phone_number: None,
                    otp_code: None,
                    otp_created_at: None,
                    is_verified: false,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/accounts/register")
            .json(&json!({ "name": "Rahim", "email": " Rahim@Example.com " }))
            .send(&make_service(accounts))
            .await;

        let body: RegisteredResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.email, "rahim@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_returns_409() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_register_customer()
            .once()
            .return_once(|_| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/accounts/register")
            .json(&json!({ "name": "Rahim", "email": "rahim@example.com" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
