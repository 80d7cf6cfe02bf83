//! Payment Callback Handlers
//!
//! The gateway sends the shopper back here with a form post naming the transaction. A success
//! also carries the gateway's validation id, which is checked with the gateway before the order
//! is marked paid.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::FormBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::payments::records::PaymentOutcome;

use crate::{
    extensions::*,
    payments::{TransactionResponse, errors::into_status_error},
    state::State,
};

/// Gateway callback form. Fields besides `tran_id` and `val_id` are ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentCallback {
    pub tran_id: Uuid,

    #[serde(default)]
    pub val_id: Option<String>,
}

async fn complete(
    depot: &mut Depot,
    callback: PaymentCallback,
    outcome: PaymentOutcome,
) -> Result<Json<TransactionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let transaction = state
        .app
        .payments
        .complete_payment(
            callback.tran_id.into(),
            outcome,
            callback.val_id,
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    tracing::info!(
        tran_id = %transaction.tran_id,
        order_uuid = %transaction.order_uuid,
        status = transaction.status.as_str(),
        "payment completed"
    );

    Ok(Json(transaction.into()))
}

/// Payment Success Callback
///
/// Marks the order paid, which issues its invoice.
#[endpoint(
    tags("payments"),
    summary = "Payment Succeeded",
    responses(
        (status_code = StatusCode::OK, description = "Transaction succeeded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Payment not confirmed by the gateway"),
        (status_code = StatusCode::NOT_FOUND, description = "Transaction not found"),
        (status_code = StatusCode::CONFLICT, description = "Transaction already completed"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn success(
    form: FormBody<PaymentCallback>,
    depot: &mut Depot,
) -> Result<Json<TransactionResponse>, StatusError> {
    complete(depot, form.into_inner(), PaymentOutcome::Success).await
}

/// Payment Failure Callback
#[endpoint(
    tags("payments"),
    summary = "Payment Failed",
    responses(
        (status_code = StatusCode::OK, description = "Transaction failed"),
        (status_code = StatusCode::NOT_FOUND, description = "Transaction not found"),
        (status_code = StatusCode::CONFLICT, description = "Transaction already completed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn fail(
    form: FormBody<PaymentCallback>,
    depot: &mut Depot,
) -> Result<Json<TransactionResponse>, StatusError> {
    complete(depot, form.into_inner(), PaymentOutcome::Fail).await
}

/// Payment Cancellation Callback
#[endpoint(
    tags("payments"),
    summary = "Payment Cancelled",
    responses(
        (status_code = StatusCode::OK, description = "Transaction cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Transaction not found"),
        (status_code = StatusCode::CONFLICT, description = "Transaction already completed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn cancel(
    form: FormBody<PaymentCallback>,
    depot: &mut Depot,
) -> Result<Json<TransactionResponse>, StatusError> {
    complete(depot, form.into_inner(), PaymentOutcome::Cancel).await
}
