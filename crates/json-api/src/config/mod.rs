//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
    storefront::StorefrontConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod storefront;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Store fees and local time.
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
