//! Start Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::payments::records::PaymentRedirect;

use crate::{
    extensions::*,
    payments::{TransactionResponse, errors::into_status_error},
    state::State,
};

/// Start Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentStartedResponse {
    pub transaction: TransactionResponse,

    /// Hosted payment page to send the shopper to
    pub redirect_url: String,
}

impl From<PaymentRedirect> for PaymentStartedResponse {
    fn from(redirect: PaymentRedirect) -> Self {
        Self {
            transaction: redirect.transaction.into(),
            redirect_url: redirect.redirect_url,
        }
    }
}

/// Start Payment Handler
///
/// Opens a gateway session for a pending order placed for online payment.
#[endpoint(
    tags("payments"),
    summary = "Start Online Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Gateway session opened"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be paid online"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "payments.start",
    skip(order, depot),
    fields(
        customer_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentStartedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let order = order.into_inner();

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer));
    span.record("order_uuid", tracing::field::display(order));

    let redirect = state
        .app
        .payments
        .start_payment(customer, order.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(redirect.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        orders::records::{OrderStatus, OrderUuid, PaymentMethod},
        payments::{
            MockPaymentsService, PaymentsServiceError,
            gateway::PaymentGatewayError,
            records::{PaymentTransactionRecord, TransactionId, TransactionStatus},
        },
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER_UUID};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        Mocks {
            payments,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("orders/{order}/payment").post(handler))
    }

    fn failing(error: PaymentsServiceError) -> MockPaymentsService {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_start_payment()
            .once()
            .return_once(move |_, _| Err(error));

        payments
    }

    async fn start(payments: MockPaymentsService) -> Option<StatusCode> {
        TestClient::post(format!("http://example.com/orders/{}/payment", OrderUuid::new()))
            .send(&make_service(payments))
            .await
            .status_code
    }

    #[tokio::test]
    async fn test_redirect_url_is_returned() -> TestResult {
        let order = OrderUuid::new();
        let tran_id = TransactionId::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_start_payment()
            .once()
            .withf(move |customer, o| *customer == TEST_CUSTOMER_UUID && *o == order)
            .return_once(move |_, _| {
                Ok(PaymentRedirect {
                    transaction: PaymentTransactionRecord {
                        tran_id,
                        order_uuid: order,
                        amount: 560_00,
                        currency: "BDT".to_string(),
                        val_id: None,
                        status: TransactionStatus::Initiated,
                        created_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    },
                    redirect_url: "https://sandbox.sslcommerz.com/gw/pay/abc".to_string(),
                })
            });

        let body: PaymentStartedResponse =
            TestClient::post(format!("http://example.com/orders/{order}/payment"))
                .send(&make_service(payments))
                .await
                .take_json()
                .await?;

        assert_eq!(body.redirect_url, "https://sandbox.sslcommerz.com/gw/pay/abc");
        assert_eq!(body.transaction.tran_id, tran_id.into_uuid());
        assert_eq!(body.transaction.amount, 560_00);
        assert_eq!(body.transaction.status, "initiated");

        Ok(())
    }

    #[tokio::test]
    async fn test_cash_on_delivery_order_is_a_conflict() -> TestResult {
        let status = start(failing(PaymentsServiceError::NotPayable {
            method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Pending,
        }))
        .await;

        assert_eq!(status, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_failure_is_a_bad_gateway() -> TestResult {
        let status = start(failing(PaymentsServiceError::Gateway(
            PaymentGatewayError::Rejected("invalid store".to_string()),
        )))
        .await;

        assert_eq!(status, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_returns_404() -> TestResult {
        let status = start(failing(PaymentsServiceError::NotFound)).await;

        assert_eq!(status, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
