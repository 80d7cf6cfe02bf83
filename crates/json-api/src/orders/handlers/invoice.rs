//! Download Invoice Handler

use std::sync::Arc;

use salvo::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    oapi::extract::PathParam,
    prelude::*,
};
use uuid::Uuid;

use crate::{extensions::*, orders::errors::invoice_status_error, state::State};

/// Download Invoice Handler
///
/// Invoices exist once an order is paid.
#[endpoint(
    tags("orders"),
    summary = "Download Invoice PDF",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Invoice PDF"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or invoice not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.invoice",
    skip(order, depot, res),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let order = order.into_inner();

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let pdf = state
        .app
        .invoices
        .download_invoice(customer, order.into())
        .await
        .map_err(invoice_status_error)?;

    res.add_header(CONTENT_TYPE, "application/pdf", true)
        .or_500("failed to set content type header")?
        .add_header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.file_name),
            true,
        )
        .or_500("failed to set content disposition header")?
        .write_body(pdf.bytes)
        .or_500("failed to write invoice body")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        invoices::{InvoicesServiceError, MockInvoicesService, records::InvoicePdf},
        orders::records::OrderUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER_UUID};

    use super::*;

    fn make_service(invoices: MockInvoicesService) -> Service {
        Mocks {
            invoices,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("orders/{order}/invoice").get(handler))
    }

    #[tokio::test]
    async fn test_pdf_is_served_as_attachment() -> TestResult {
        let uuid = OrderUuid::new();

        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_download_invoice()
            .once()
            .withf(move |customer, order| *customer == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(|_, _| {
                Ok(InvoicePdf {
                    file_name: "invoice_INVORD20260101120000123-20260101120000.pdf".to_string(),
                    bytes: b"%PDF-1.5".to_vec(),
                })
            });

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}/invoice"))
            .send(&make_service(invoices))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());

        assert_eq!(content_type, Some("application/pdf"));

        let disposition = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        assert!(disposition.contains("invoice_INVORD20260101120000123-20260101120000.pdf"));

        let body = res.take_string().await?;

        assert!(body.starts_with("%PDF"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unpaid_order_has_no_invoice() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_download_invoice()
            .once()
            .return_once(|_, _| Err(InvoicesServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}/invoice", OrderUuid::new()))
            .send(&make_service(invoices))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
