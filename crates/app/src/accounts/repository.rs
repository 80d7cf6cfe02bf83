//! Accounts repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::accounts::{
    data::NewCustomer,
    records::{CustomerRecord, CustomerUuid, LoginAttemptUuid, SessionUuid},
};

const CREATE_CUSTOMER_SQL: &str = include_str!("sql/create_customer.sql");
const CREATE_PROFILE_SQL: &str = include_str!("sql/create_profile.sql");
const GET_CUSTOMER_SQL: &str = include_str!("sql/get_customer.sql");
const GET_CUSTOMER_BY_EMAIL_SQL: &str = include_str!("sql/get_customer_by_email.sql");
const STORE_OTP_SQL: &str = include_str!("sql/store_otp.sql");
const MARK_VERIFIED_SQL: &str = include_str!("sql/mark_verified.sql");
const LOCK_LOGIN_ATTEMPTS_SQL: &str = include_str!("sql/lock_login_attempts.sql");
const COUNT_FAILED_ATTEMPTS_SQL: &str = include_str!("sql/count_failed_attempts.sql");
const RECORD_FAILED_ATTEMPT_SQL: &str = include_str!("sql/record_failed_attempt.sql");
const CLEAR_FAILED_ATTEMPTS_SQL: &str = include_str!("sql/clear_failed_attempts.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_SESSION_CUSTOMER_SQL: &str = include_str!("sql/find_session_customer.sql");
const REVOKE_SESSION_SQL: &str = include_str!("sql/revoke_session.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: &NewCustomer,
    ) -> Result<CustomerRecord, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(CREATE_CUSTOMER_SQL)
            .bind(customer.uuid.into_uuid())
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer.phone_number.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PROFILE_SQL)
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(GET_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Locks the customer row for the rest of the transaction.
    pub(crate) async fn get_customer_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<CustomerRecord, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(GET_CUSTOMER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn store_otp(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        code: &str,
        created_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(STORE_OTP_SQL)
            .bind(customer.into_uuid())
            .bind(code)
            .bind(SqlxTimestamp::from(created_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_verified(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_VERIFIED_SQL)
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Serialises verification attempts for one email until the transaction ends.
    pub(crate) async fn lock_login_attempts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_LOGIN_ATTEMPTS_SQL)
            .bind(email)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn count_failed_attempts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        since: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_FAILED_ATTEMPTS_SQL)
            .bind(email)
            .bind(SqlxTimestamp::from(since))
            .fetch_one(&mut **tx)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub(crate) async fn record_failed_attempt(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        attempted_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(RECORD_FAILED_ATTEMPT_SQL)
            .bind(LoginAttemptUuid::new().into_uuid())
            .bind(email)
            .bind(SqlxTimestamp::from(attempted_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn clear_failed_attempts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<(), sqlx::Error> {
        query(CLEAR_FAILED_ATTEMPTS_SQL)
            .bind(email)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        token_hash: &str,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(SessionUuid::new().into_uuid())
            .bind(customer.into_uuid())
            .bind(token_hash)
            .bind(SqlxTimestamp::from(created_at))
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_session_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<CustomerUuid>, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(FIND_SESSION_CUSTOMER_SQL)
            .bind(token_hash)
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&mut **tx)
            .await
            .map(|customer| customer.map(CustomerUuid::from_uuid))
    }

    pub(crate) async fn revoke_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_SESSION_SQL)
            .bind(token_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            otp_code: row.try_get("otp_code")?,
            otp_created_at: row
                .try_get::<Option<SqlxTimestamp>, _>("otp_created_at")?
                .map(SqlxTimestamp::to_jiff),
            is_verified: row.try_get("is_verified")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
