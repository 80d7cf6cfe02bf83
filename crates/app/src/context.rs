//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    accounts::{AccountsService, PgAccountsService, email::EmailSender},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        checkout::{CheckoutService, PgCheckoutService},
        coupons::{CouponsService, PgCouponsService},
        invoices::{InvoicesService, PgInvoicesService},
        locations::{LocationsService, PgLocationsService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentsService, PgPaymentsService, gateway::PaymentGateway},
    },
    settings::StoreSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Outside collaborators the services talk to.
pub struct Integrations {
    pub email: Arc<dyn EmailSender>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub currency: String,
}

#[derive(Clone)]
pub struct AppContext {
    pub settings: StoreSettings,
    pub accounts: Arc<dyn AccountsService>,
    pub locations: Arc<dyn LocationsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub coupons: Arc<dyn CouponsService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub invoices: Arc<dyn InvoicesService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        settings: StoreSettings,
        integrations: Integrations,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect_with_max(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool), settings, integrations))
    }

    #[must_use]
    pub fn from_db(db: Db, settings: StoreSettings, integrations: Integrations) -> Self {
        let Integrations {
            email,
            gateway,
            currency,
        } = integrations;

        Self {
            settings,
            accounts: Arc::new(PgAccountsService::new(db.clone(), email)),
            locations: Arc::new(PgLocationsService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone(), settings)),
            checkout: Arc::new(PgCheckoutService::new(db.clone(), settings)),
            orders: Arc::new(PgOrdersService::new(db.clone(), settings)),
            invoices: Arc::new(PgInvoicesService::new(db.clone(), settings)),
            payments: Arc::new(PgPaymentsService::new(db, settings, gateway, currency)),
        }
    }
}
