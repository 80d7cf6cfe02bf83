//! Database connection management

use sqlx::{
    PgPool, Postgres, Row, Transaction,
    migrate::MigrateError,
    postgres::{PgPoolOptions, PgRow},
};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or `BEGIN` fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Connect to `PostgreSQL` with a bounded pool.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_max(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the bundled schema migrations.
///
/// # Errors
///
/// Returns an error if any migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Read a non-negative `BIGINT` money column as minor units.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Quantities share the non-negative `BIGINT` representation of amounts.
pub(crate) fn try_get_quantity(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    try_get_amount(row, col)
}

pub(crate) fn try_get_optional_amount(row: &PgRow, col: &str) -> Result<Option<u64>, sqlx::Error> {
    let amount_i64: Option<i64> = row.try_get(col)?;

    amount_i64
        .map(u64::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

/// Convert minor units into a bindable `BIGINT`.
pub(crate) fn amount_to_i64(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
