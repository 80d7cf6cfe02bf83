//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::{
        invoices::generator::InvoiceGenerator,
        orders::{
            records::{OrderStatus, OrderUuid, PaymentMethod},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            service::transition_in,
        },
        payments::{
            errors::PaymentsServiceError,
            gateway::{PaymentGateway, PaymentSessionRequest, PaymentValidation},
            records::{
                PaymentOutcome, PaymentRedirect, PaymentTransactionRecord, TransactionId,
                TransactionStatus,
            },
            repository::PgPaymentsRepository,
        },
    },
    settings::StoreSettings,
};

/// Currency sent with every session unless configured otherwise.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Checks the gateway's record of a payment against the transaction it claims to settle.
fn verify(
    transaction: &PaymentTransactionRecord,
    validation: &PaymentValidation,
) -> Result<(), PaymentsServiceError> {
    if !validation.is_valid() {
        return Err(PaymentsServiceError::Unverified("gateway does not report it as paid"));
    }

    if validation.tran_id.as_deref() != Some(transaction.tran_id.to_string().as_str()) {
        return Err(PaymentsServiceError::Unverified("transaction id does not match"));
    }

    if validation.amount != Some(transaction.amount) {
        return Err(PaymentsServiceError::Unverified("amount does not match"));
    }

    let currency_matches = validation
        .currency
        .as_deref()
        .is_some_and(|currency| currency.eq_ignore_ascii_case(&transaction.currency));

    if !currency_matches {
        return Err(PaymentsServiceError::Unverified("currency does not match"));
    }

    Ok(())
}

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    payments_repository: PgPaymentsRepository,
    orders_repository: PgOrdersRepository,
    order_items_repository: PgOrderItemsRepository,
    invoices: InvoiceGenerator,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(
        db: Db,
        settings: StoreSettings,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            db,
            gateway,
            currency: currency.into(),
            payments_repository: PgPaymentsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
            invoices: InvoiceGenerator::new(settings),
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.start_payment",
        skip(self),
        fields(customer_uuid = %customer, order_uuid = %order),
        err
    )]
    async fn start_payment(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<PaymentRedirect, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .orders_repository
            .get_customer_order(&mut tx, customer, order)
            .await?;

        if order.payment_method != PaymentMethod::Online || order.status != OrderStatus::Pending {
            return Err(PaymentsServiceError::NotPayable {
                method: order.payment_method,
                status: order.status,
            });
        }

        let buyer = self
            .payments_repository
            .get_payment_customer(&mut tx, order.uuid)
            .await?;
        let items = self
            .order_items_repository
            .list_order_items(&mut tx, order.uuid)
            .await?;
        let item_count = self
            .payments_repository
            .count_order_items(&mut tx, order.uuid)
            .await?;

        let transaction = self
            .payments_repository
            .create_transaction(
                &mut tx,
                TransactionId::new(),
                order.uuid,
                order.total_price,
                &self.currency,
            )
            .await?;

        let product_name = items
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let request = PaymentSessionRequest {
            tran_id: transaction.tran_id,
            total_amount: transaction.amount,
            currency: transaction.currency.clone(),
            customer_name: buyer.name,
            customer_email: buyer.email,
            customer_phone: order.phone_number.clone(),
            customer_address: buyer.address_line.unwrap_or_default(),
            customer_city: buyer.city_name.unwrap_or_default(),
            item_count,
            product_name,
        };

        // The transaction row is only kept once the gateway has opened a session.
        let session = self.gateway.create_session(&request).await?;

        tx.commit().await?;

        info!(tran_id = %transaction.tran_id, amount = transaction.amount, "payment started");

        Ok(PaymentRedirect {
            transaction,
            redirect_url: session.redirect_url,
        })
    }

    #[tracing::instrument(
        name = "payments.service.complete_payment",
        skip(self, val_id),
        fields(tran_id = %tran_id, outcome = ?outcome),
        err
    )]
    async fn complete_payment(
        &self,
        tran_id: TransactionId,
        outcome: PaymentOutcome,
        val_id: Option<String>,
        now: Timestamp,
    ) -> Result<PaymentTransactionRecord, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let transaction = self
            .payments_repository
            .lock_transaction(&mut tx, tran_id)
            .await?;

        if transaction.status != TransactionStatus::Initiated {
            warn!(status = %transaction.status, "payment callback for a settled transaction");

            return Err(PaymentsServiceError::AlreadyCompleted(transaction.status));
        }

        // Only a success is checked with the gateway; failures and cancellations change nothing
        // but the transaction row.
        let val_id = match outcome {
            PaymentOutcome::Success => {
                let val_id = val_id
                    .filter(|val_id| !val_id.is_empty())
                    .ok_or(PaymentsServiceError::Unverified("callback has no validation id"))?;

                let validation = self.gateway.validate(&val_id).await?;

                if let Err(error) = verify(&transaction, &validation) {
                    warn!(status = %validation.status, "unverified payment success: {error}");

                    return Err(error);
                }

                Some(val_id)
            }
            PaymentOutcome::Fail | PaymentOutcome::Cancel => None,
        };

        let updated = self
            .payments_repository
            .update_status(
                &mut tx,
                tran_id,
                outcome.transaction_status(),
                val_id.as_deref(),
            )
            .await?;

        if outcome == PaymentOutcome::Success {
            let order = self
                .orders_repository
                .lock_order(&mut tx, updated.order_uuid)
                .await?;

            transition_in(
                &self.orders_repository,
                &self.invoices,
                &mut tx,
                &order,
                OrderStatus::Paid,
                now,
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            order_uuid = %updated.order_uuid,
            status = %updated.status,
            "payment completed"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Open a gateway session for one of the customer's pending online orders.
    async fn start_payment(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<PaymentRedirect, PaymentsServiceError>;

    /// Record the gateway's verdict. A success is first confirmed with the gateway using
    /// `val_id`, then marks the order paid, which issues its invoice.
    async fn complete_payment(
        &self,
        tran_id: TransactionId,
        outcome: PaymentOutcome,
        val_id: Option<String>,
        now: Timestamp,
    ) -> Result<PaymentTransactionRecord, PaymentsServiceError>;
}
