//! Payments Config

use clap::Args;
use storefront_app::domain::payments::{
    DEFAULT_CURRENCY,
    sslcommerz::{SANDBOX_API_URL, SANDBOX_VALIDATION_URL, SslCommerzConfig},
};

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Session API endpoint of the payment gateway
    #[arg(long, env = "PAYMENT_GATEWAY_URL", default_value = SANDBOX_API_URL)]
    pub payment_gateway_url: String,

    /// Validation API endpoint used to confirm successful payments
    #[arg(long, env = "PAYMENT_VALIDATION_URL", default_value = SANDBOX_VALIDATION_URL)]
    pub payment_validation_url: String,

    /// Merchant store identifier
    #[arg(long, env = "PAYMENT_STORE_ID")]
    pub payment_store_id: String,

    /// Merchant store password
    #[arg(long, env = "PAYMENT_STORE_PASSWORD", hide_env_values = true)]
    pub payment_store_password: String,

    /// Where the gateway sends the shopper after a successful payment
    #[arg(long, env = "PAYMENT_SUCCESS_URL")]
    pub payment_success_url: String,

    /// Where the gateway sends the shopper after a failed payment
    #[arg(long, env = "PAYMENT_FAIL_URL")]
    pub payment_fail_url: String,

    /// Where the gateway sends the shopper after cancelling
    #[arg(long, env = "PAYMENT_CANCEL_URL")]
    pub payment_cancel_url: String,

    /// ISO currency code charged
    #[arg(long = "payment-currency", env = "PAYMENT_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn gateway_config(&self) -> SslCommerzConfig {
        SslCommerzConfig {
            api_url: self.payment_gateway_url.clone(),
            validation_url: self.payment_validation_url.clone(),
            store_id: self.payment_store_id.clone(),
            store_password: self.payment_store_password.clone(),
            success_url: self.payment_success_url.clone(),
            fail_url: self.payment_fail_url.clone(),
            cancel_url: self.payment_cancel_url.clone(),
        }
    }
}
