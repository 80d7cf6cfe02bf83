//! SSLCOMMERZ session and validation API client.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    domain::payments::gateway::{
        PaymentGateway, PaymentGatewayError, PaymentSession, PaymentSessionRequest,
        PaymentValidation,
    },
    money::{format_decimal, parse_amount},
};

/// Sandbox session endpoint.
pub const SANDBOX_API_URL: &str = "https://sandbox.sslcommerz.com/gwprocess/v4/api.php";

/// Sandbox order validation endpoint.
pub const SANDBOX_VALIDATION_URL: &str =
    "https://sandbox.sslcommerz.com/validator/api/validationserverAPI.php";

/// Configuration for an SSLCOMMERZ store.
#[derive(Clone)]
pub struct SslCommerzConfig {
    /// Session API endpoint, e.g. [`SANDBOX_API_URL`].
    pub api_url: String,

    /// Order validation endpoint, e.g. [`SANDBOX_VALIDATION_URL`].
    pub validation_url: String,

    pub store_id: String,

    pub store_password: String,

    /// Where the gateway sends the shopper back to on each outcome.
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
}

impl fmt::Debug for SslCommerzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslCommerzConfig")
            .field("api_url", &self.api_url)
            .field("validation_url", &self.validation_url)
            .field("store_id", &self.store_id)
            .field("store_password", &"[redacted]")
            .field("success_url", &self.success_url)
            .field("fail_url", &self.fail_url)
            .field("cancel_url", &self.cancel_url)
            .finish()
    }
}

/// HTTP client for the SSLCOMMERZ hosted payment page.
#[derive(Debug, Clone)]
pub struct SslCommerzGateway {
    config: SslCommerzConfig,
    http: Client,
}

impl SslCommerzGateway {
    #[must_use]
    pub fn new(config: SslCommerzConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

/// Form fields posted to the session API.
fn session_form(
    config: &SslCommerzConfig,
    request: &PaymentSessionRequest,
) -> Vec<(&'static str, String)> {
    vec![
        ("store_id", config.store_id.clone()),
        ("store_passwd", config.store_password.clone()),
        ("total_amount", format_decimal(request.total_amount)),
        ("currency", request.currency.clone()),
        ("tran_id", request.tran_id.to_string()),
        ("success_url", config.success_url.clone()),
        ("fail_url", config.fail_url.clone()),
        ("cancel_url", config.cancel_url.clone()),
        ("emi_option", "0".to_string()),
        ("cus_name", request.customer_name.clone()),
        ("cus_email", request.customer_email.clone()),
        ("cus_phone", request.customer_phone.clone()),
        ("cus_add1", request.customer_address.clone()),
        ("cus_city", request.customer_city.clone()),
        ("cus_country", "Bangladesh".to_string()),
        ("shipping_method", "NO".to_string()),
        ("num_of_item", request.item_count.to_string()),
        ("product_name", request.product_name.clone()),
        ("product_category", "General".to_string()),
        ("product_profile", "general".to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    status: String,

    #[serde(rename = "GatewayPageURL", default)]
    gateway_page_url: Option<String>,

    #[serde(rename = "failedreason", default)]
    failed_reason: Option<String>,
}

impl SessionResponse {
    fn into_session(self) -> Result<PaymentSession, PaymentGatewayError> {
        if !self.status.eq_ignore_ascii_case("SUCCESS") {
            return Err(PaymentGatewayError::Rejected(
                self.failed_reason.unwrap_or(self.status),
            ));
        }

        match self.gateway_page_url {
            Some(url) if !url.is_empty() => Ok(PaymentSession { redirect_url: url }),
            _ => Err(PaymentGatewayError::UnexpectedResponse(
                "session response has no GatewayPageURL".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    status: String,

    #[serde(default)]
    tran_id: Option<String>,

    #[serde(default)]
    amount: Option<String>,

    #[serde(default)]
    currency: Option<String>,
}

impl ValidationResponse {
    fn into_validation(self) -> Result<PaymentValidation, PaymentGatewayError> {
        let amount = self
            .amount
            .as_deref()
            .map(parse_amount)
            .transpose()
            .map_err(|error| PaymentGatewayError::UnexpectedResponse(error.to_string()))?;

        Ok(PaymentValidation {
            status: self.status,
            tran_id: self.tran_id,
            amount,
            currency: self.currency,
        })
    }
}

#[async_trait]
impl PaymentGateway for SslCommerzGateway {
    #[tracing::instrument(
        name = "payments.sslcommerz.create_session",
        skip(self, request),
        fields(tran_id = %request.tran_id),
        err
    )]
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let response = self
            .http
            .post(&self.config.api_url)
            .form(&session_form(&self.config, request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "session request failed with status {status}: {text}"
            )));
        }

        let parsed: SessionResponse = response.json().await?;

        parsed.into_session()
    }

    #[tracing::instrument(name = "payments.sslcommerz.validate", skip(self, val_id), err)]
    async fn validate(&self, val_id: &str) -> Result<PaymentValidation, PaymentGatewayError> {
        let response = self
            .http
            .get(&self.config.validation_url)
            .query(&[
                ("val_id", val_id),
                ("store_id", self.config.store_id.as_str()),
                ("store_passwd", self.config.store_password.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();

            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "validation request failed with status {status}"
            )));
        }

        let parsed: ValidationResponse = response.json().await?;

        parsed.into_validation()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::payments::records::TransactionId;

    use super::*;

    fn config() -> SslCommerzConfig {
        SslCommerzConfig {
            api_url: SANDBOX_API_URL.to_string(),
            validation_url: SANDBOX_VALIDATION_URL.to_string(),
            store_id: "teststore".to_string(),
            store_password: "s3cret".to_string(),
            success_url: "https://shop.test/payments/success".to_string(),
            fail_url: "https://shop.test/payments/fail".to_string(),
            cancel_url: "https://shop.test/payments/cancel".to_string(),
        }
    }

    fn request() -> PaymentSessionRequest {
        PaymentSessionRequest {
            tran_id: TransactionId::new(),
            total_amount: 560_00,
            currency: "BDT".to_string(),
            customer_name: "Ayesha Rahman".to_string(),
            customer_email: "ayesha@example.com".to_string(),
            customer_phone: "01700000000".to_string(),
            customer_address: "House 12, Road 5".to_string(),
            customer_city: "Dhaka City".to_string(),
            item_count: 3,
            product_name: "Shirt, Mug".to_string(),
        }
    }

    fn field<'a>(form: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        form.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn form_carries_amount_and_transaction() {
        let request = request();
        let form = session_form(&config(), &request);

        assert_eq!(field(&form, "total_amount"), Some("560.00"));
        assert_eq!(field(&form, "currency"), Some("BDT"));
        assert_eq!(
            field(&form, "tran_id"),
            Some(request.tran_id.to_string().as_str())
        );
        assert_eq!(field(&form, "store_passwd"), Some("s3cret"));
        assert_eq!(field(&form, "num_of_item"), Some("3"));
        assert_eq!(
            field(&form, "fail_url"),
            Some("https://shop.test/payments/fail")
        );
    }

    #[test]
    fn debug_hides_store_password() {
        let debug = format!("{:?}", config());

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("teststore"));
    }

    #[test]
    fn successful_response_yields_redirect() -> TestResult {
        let response: SessionResponse = serde_json::from_str(
            r#"{"status":"SUCCESS","GatewayPageURL":"https://sandbox.sslcommerz.com/pay/abc"}"#,
        )?;

        let session = response.into_session()?;

        assert_eq!(session.redirect_url, "https://sandbox.sslcommerz.com/pay/abc");

        Ok(())
    }

    #[test]
    fn failed_response_reports_reason() -> TestResult {
        let response: SessionResponse = serde_json::from_str(
            r#"{"status":"FAILED","failedreason":"Store Credential Error Or Store is De-active"}"#,
        )?;

        let result = response.into_session();

        assert!(
            matches!(
                &result,
                Err(PaymentGatewayError::Rejected(reason)) if reason.starts_with("Store Credential")
            ),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn success_without_url_is_unexpected() -> TestResult {
        let response: SessionResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","GatewayPageURL":""}"#)?;

        let result = response.into_session();

        assert!(
            matches!(result, Err(PaymentGatewayError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn validation_response_converts_amount_to_minor_units() -> TestResult {
        let response: ValidationResponse = serde_json::from_str(
            r#"{"status":"VALID","tran_id":"abc","val_id":"v1","amount":"560.00","currency":"BDT"}"#,
        )?;

        let validation = response.into_validation()?;

        assert!(validation.is_valid());
        assert_eq!(validation.tran_id.as_deref(), Some("abc"));
        assert_eq!(validation.amount, Some(560_00));
        assert_eq!(validation.currency.as_deref(), Some("BDT"));

        Ok(())
    }

    #[test]
    fn invalid_transaction_response_has_no_amount() -> TestResult {
        let response: ValidationResponse =
            serde_json::from_str(r#"{"status":"INVALID_TRANSACTION"}"#)?;

        let validation = response.into_validation()?;

        assert!(!validation.is_valid());
        assert_eq!(validation.amount, None);

        Ok(())
    }

    #[test]
    fn malformed_amount_is_unexpected() -> TestResult {
        let response: ValidationResponse =
            serde_json::from_str(r#"{"status":"VALID","amount":"five hundred"}"#)?;

        let result = response.into_validation();

        assert!(
            matches!(result, Err(PaymentGatewayError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }
}
