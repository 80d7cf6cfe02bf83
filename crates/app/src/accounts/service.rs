//! Accounts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    accounts::{
        AccountsServiceError,
        data::NewCustomer,
        email::{EmailSender, otp_message},
        otp::{ATTEMPT_WINDOW, MAX_FAILED_ATTEMPTS, generate_otp, otp_matches},
        records::{CustomerRecord, CustomerUuid, IssuedSession},
        repository::PgAccountsRepository,
        token::{format_session_token, generate_session_secret, hash_session_token, parse_session_token},
    },
    database::Db,
};

/// Lifetime of a bearer session.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(24 * 30);

#[derive(Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
    email: Arc<dyn EmailSender>,
}

impl std::fmt::Debug for PgAccountsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgAccountsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db, email: Arc<dyn EmailSender>) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
            email,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AccountsService for PgAccountsService {
    #[tracing::instrument(
        name = "accounts.service.register_customer",
        skip(self, customer),
        fields(customer_uuid = %customer.uuid),
        err
    )]
    async fn register_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, AccountsServiceError> {
        let customer = NewCustomer {
            name: customer.name.trim().to_string(),
            email: normalize_email(&customer.email),
            phone_number: customer
                .phone_number
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            ..customer
        };

        if customer.name.is_empty() || !customer.email.contains('@') {
            return Err(AccountsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_customer(&mut tx, &customer).await?;

        self.repository.create_profile(&mut tx, created.uuid).await?;

        tx.commit().await?;

        info!("registered customer");

        Ok(created)
    }

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let customer = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }

    #[tracing::instrument(name = "accounts.service.request_otp", skip(self, email), err)]
    async fn request_otp(&self, email: &str, now: Timestamp) -> Result<(), AccountsServiceError> {
        let email = normalize_email(email);
        let code = generate_otp();

        let mut tx = self.db.begin().await?;

        let customer = self.repository.get_customer_by_email(&mut tx, &email).await?;

        self.repository
            .store_otp(&mut tx, customer.uuid, &code, now)
            .await?;

        tx.commit().await?;

        self.email
            .send(otp_message(&customer.email, &customer.name, &code))
            .await?;

        info!(customer_uuid = %customer.uuid, "issued otp");

        Ok(())
    }

    #[tracing::instrument(name = "accounts.service.verify_otp", skip(self, email, code), err)]
    async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        now: Timestamp,
    ) -> Result<IssuedSession, AccountsServiceError> {
        let email = normalize_email(email);

        let mut tx = self.db.begin().await?;

        self.repository
            .lock_login_attempts(&mut tx, &email)
            .await?;

        let window_start = now - ATTEMPT_WINDOW;
        let failed_attempts = self
            .repository
            .count_failed_attempts(&mut tx, &email, window_start)
            .await?;

        if failed_attempts >= MAX_FAILED_ATTEMPTS {
            warn!(failed_attempts, "otp verification rate limited");

            return Err(AccountsServiceError::RateLimited);
        }

        let customer = match self.repository.get_customer_by_email(&mut tx, &email).await {
            Ok(customer) => Some(customer),
            Err(sqlx::Error::RowNotFound) => None,
            Err(error) => return Err(error.into()),
        };

        let verified = customer.as_ref().filter(|customer| {
            otp_matches(
                customer.otp_code.as_deref(),
                customer.otp_created_at,
                code,
                now,
            )
        });

        let Some(customer) = verified else {
            self.repository
                .record_failed_attempt(&mut tx, &email, now)
                .await?;

            tx.commit().await?;

            warn!("otp verification failed");

            return Err(AccountsServiceError::InvalidOtp);
        };

        let secret = generate_session_secret();
        let token = format_session_token(&secret);
        let expires_at = now + SESSION_TTL;

        self.repository.mark_verified(&mut tx, customer.uuid).await?;
        self.repository.clear_failed_attempts(&mut tx, &email).await?;
        self.repository
            .create_session(
                &mut tx,
                customer.uuid,
                &hash_session_token(&token),
                now,
                expires_at,
            )
            .await?;

        tx.commit().await?;

        info!(customer_uuid = %customer.uuid, "otp verified, session issued");

        Ok(IssuedSession {
            customer_uuid: customer.uuid,
            token,
            expires_at,
        })
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
        now: Timestamp,
    ) -> Result<CustomerUuid, AccountsServiceError> {
        parse_session_token(bearer_token).map_err(|_token_error| AccountsServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let customer = self
            .repository
            .find_session_customer(&mut tx, &hash_session_token(bearer_token), now)
            .await?;

        tx.commit().await?;

        customer.ok_or(AccountsServiceError::NotFound)
    }

    #[tracing::instrument(name = "accounts.service.revoke_session", skip(self, bearer_token), err)]
    async fn revoke_session(&self, bearer_token: &str) -> Result<(), AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .revoke_session(&mut tx, &hash_session_token(bearer_token))
            .await?;

        if rows_affected == 0 {
            return Err(AccountsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("session revoked");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Registers a customer together with their profile.
    async fn register_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, AccountsServiceError>;

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, AccountsServiceError>;

    /// Issues a new login code and emails it.
    async fn request_otp(&self, email: &str, now: Timestamp) -> Result<(), AccountsServiceError>;

    /// Exchanges a valid login code for a bearer session.
    async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        now: Timestamp,
    ) -> Result<IssuedSession, AccountsServiceError>;

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
        now: Timestamp,
    ) -> Result<CustomerUuid, AccountsServiceError>;

    async fn revoke_session(&self, bearer_token: &str) -> Result<(), AccountsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use sqlx::query;
    use testresult::TestResult;

    use crate::{
        accounts::otp::OTP_VALIDITY,
        test::{TestContext, helpers::create_customer},
    };

    use super::*;

    async fn set_otp(ctx: &TestContext, customer: CustomerUuid, code: &str, at: Timestamp) {
        query("UPDATE customers SET otp_code = $2, otp_created_at = $3 WHERE uuid = $1")
            .bind(customer.into_uuid())
            .bind(code)
            .bind(jiff_sqlx::Timestamp::from(at))
            .execute(ctx.db.pool())
            .await
            .expect("failed to set otp");
    }

    #[tokio::test]
    async fn register_creates_profile() -> TestResult {
        let ctx = TestContext::new().await;

        let customer = create_customer(&ctx, " Rahim@Example.com ").await?;

        let profiles: i64 =
            sqlx::query_scalar("SELECT count(*) FROM customer_profiles WHERE customer_uuid = $1")
                .bind(customer.into_uuid())
                .fetch_one(ctx.db.pool())
                .await?;

        let record = ctx.accounts.get_customer(customer).await?;

        assert_eq!(profiles, 1);
        assert_eq!(record.email, "rahim@example.com");
        assert!(!record.is_verified);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        create_customer(&ctx, "dup@example.com").await?;
        let result = create_customer(&ctx, "DUP@example.com").await;

        assert!(
            matches!(result, Err(AccountsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn request_otp_stores_a_code() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "otp@example.com").await?;

        ctx.accounts
            .request_otp("otp@example.com", Timestamp::now())
            .await?;

        let record = ctx.accounts.get_customer(customer).await?;

        assert_eq!(record.otp_code.map(|code| code.len()), Some(6));
        assert!(record.otp_created_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn verify_otp_issues_a_working_session() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "login@example.com").await?;
        let now = Timestamp::now();

        set_otp(&ctx, customer, "123456", now).await;

        let session = ctx
            .accounts
            .verify_otp("login@example.com", "123456", now)
            .await?;

        let authenticated = ctx
            .accounts
            .authenticate_bearer(&session.token, now)
            .await?;

        let record = ctx.accounts.get_customer(customer).await?;

        assert_eq!(authenticated, customer);
        assert!(record.is_verified);
        assert_eq!(record.otp_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn expired_otp_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "late@example.com").await?;
        let issued = Timestamp::now();

        set_otp(&ctx, customer, "123456", issued).await;

        let result = ctx
            .accounts
            .verify_otp(
                "late@example.com",
                "123456",
                issued + OTP_VALIDITY + SignedDuration::from_secs(1),
            )
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::InvalidOtp)),
            "expected InvalidOtp, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn sixth_failed_attempt_is_rate_limited() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "brute@example.com").await?;
        let now = Timestamp::now();

        set_otp(&ctx, customer, "123456", now).await;

        for _ in 0..MAX_FAILED_ATTEMPTS {
            let result = ctx
                .accounts
                .verify_otp("brute@example.com", "000000", now)
                .await;

            assert!(
                matches!(result, Err(AccountsServiceError::InvalidOtp)),
                "expected InvalidOtp, got {result:?}"
            );
        }

        let result = ctx
            .accounts
            .verify_otp("brute@example.com", "123456", now)
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::RateLimited)),
            "expected RateLimited, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_bad_guesses_stop_at_the_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "burst@example.com").await?;
        let now = Timestamp::now();

        set_otp(&ctx, customer, "123456", now).await;

        let mut guesses = tokio::task::JoinSet::new();

        for _ in 0..8 {
            let accounts = ctx.accounts.clone();

            guesses.spawn(async move {
                accounts
                    .verify_otp("burst@example.com", "000000", now)
                    .await
            });
        }

        let mut invalid = 0;
        let mut limited = 0;

        while let Some(result) = guesses.join_next().await {
            match result? {
                Err(AccountsServiceError::InvalidOtp) => invalid += 1,
                Err(AccountsServiceError::RateLimited) => limited += 1,
                other => panic!("unexpected verification result: {other:?}"),
            }
        }

        assert_eq!(invalid, MAX_FAILED_ATTEMPTS);
        assert_eq!(limited, 8 - MAX_FAILED_ATTEMPTS);

        let recorded: i64 = sqlx::query_scalar("SELECT count(*) FROM login_attempts")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(u64::try_from(recorded)?, MAX_FAILED_ATTEMPTS);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_email_counts_as_failed_attempt() {
        let ctx = TestContext::new().await;

        let result = ctx
            .accounts
            .verify_otp("nobody@example.com", "123456", Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::InvalidOtp)),
            "expected InvalidOtp, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoked_session_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "bye@example.com").await?;
        let now = Timestamp::now();

        set_otp(&ctx, customer, "654321", now).await;

        let session = ctx
            .accounts
            .verify_otp("bye@example.com", "654321", now)
            .await?;

        ctx.accounts.revoke_session(&session.token).await?;

        let result = ctx.accounts.authenticate_bearer(&session.token, now).await;

        assert!(
            matches!(result, Err(AccountsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .accounts
            .authenticate_bearer("garbage", Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
