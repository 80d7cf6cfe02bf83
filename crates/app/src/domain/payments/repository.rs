//! Payment Transactions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::{
        orders::records::OrderUuid,
        payments::records::{PaymentTransactionRecord, TransactionId, TransactionStatus},
    },
};

const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");
const LOCK_TRANSACTION_SQL: &str = include_str!("sql/lock_transaction.sql");
const UPDATE_TRANSACTION_STATUS_SQL: &str = include_str!("sql/update_transaction_status.sql");
const GET_PAYMENT_CUSTOMER_SQL: &str = include_str!("sql/get_payment_customer.sql");
const COUNT_ORDER_ITEMS_SQL: &str = include_str!("sql/count_order_items.sql");

/// Contact details sent to the gateway with a session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaymentCustomer {
    pub name: String,
    pub email: String,
    pub address_line: Option<String>,
    pub city_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tran_id: TransactionId,
        order: OrderUuid,
        amount: u64,
        currency: &str,
    ) -> Result<PaymentTransactionRecord, sqlx::Error> {
        query_as::<Postgres, PaymentTransactionRecord>(CREATE_TRANSACTION_SQL)
            .bind(tran_id.into_uuid())
            .bind(order.into_uuid())
            .bind(amount_to_i64(amount, "amount")?)
            .bind(currency)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tran_id: TransactionId,
    ) -> Result<PaymentTransactionRecord, sqlx::Error> {
        query_as::<Postgres, PaymentTransactionRecord>(LOCK_TRANSACTION_SQL)
            .bind(tran_id.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tran_id: TransactionId,
        status: TransactionStatus,
        val_id: Option<&str>,
    ) -> Result<PaymentTransactionRecord, sqlx::Error> {
        query_as::<Postgres, PaymentTransactionRecord>(UPDATE_TRANSACTION_STATUS_SQL)
            .bind(tran_id.into_uuid())
            .bind(status.as_str())
            .bind(val_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentCustomer, sqlx::Error> {
        query_as::<Postgres, PaymentCustomer>(GET_PAYMENT_CUSTOMER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentTransactionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<&str, _>("status")?
            .parse::<TransactionStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let created_at: SqlxTimestamp = row.try_get("created_at")?;
        let updated_at: SqlxTimestamp = row.try_get("updated_at")?;

        Ok(Self {
            tran_id: TransactionId::from_uuid(row.try_get("tran_id")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            amount: try_get_amount(row, "amount")?,
            currency: row.try_get("currency")?,
            val_id: row.try_get("val_id")?,
            status,
            created_at: created_at.to_jiff(),
            updated_at: updated_at.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentCustomer {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            address_line: row.try_get("address_line")?,
            city_name: row.try_get("city_name")?,
        })
    }
}
