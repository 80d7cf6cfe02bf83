//! Storefront JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use storefront_app::{
    accounts::email::LogEmailSender,
    context::{AppContext, Integrations},
    domain::payments::sslcommerz::SslCommerzGateway,
};

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod accounts;
mod auth;
mod carts;
mod checkout;
mod config;
mod extensions;
mod healthcheck;
mod locations;
mod observability;
mod orders;
mod payments;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Storefront JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let settings = match config.storefront.store_settings() {
        Ok(settings) => settings,
        Err(source) => {
            error!("invalid store settings: {source}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let integrations = Integrations {
        email: Arc::new(LogEmailSender),
        gateway: Arc::new(SslCommerzGateway::new(config.payments.gateway_config())),
        currency: config.payments.currency.clone(),
    };

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.database.database_max_connections,
        settings,
        integrations,
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(State::from_app_context(app)))
        .push(router::app_router());

    let doc = OpenApi::new("Storefront API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    observability.shutdown();
}
