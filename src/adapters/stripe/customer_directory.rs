//! Stripe customer directory adapter.
//!
//! Implements the `CustomerDirectory` port against the Stripe REST API.
//!
//! # Resource bounds
//!
//! - Every attempt is bounded by the configured timeout; a timeout becomes
//!   `LookupErrorCode::Timeout`
//! - Retryable failures (network, timeout, 429, 5xx) are retried at most
//!   `max_retries` times with a fixed backoff
//! - Customer creation sends an `Idempotency-Key` so retries cannot duplicate
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_timeout(Duration::from_secs(5));
//! let directory = StripeCustomerDirectory::new(config)?;
//! ```

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{CreateCustomerRequest, Customer, CustomerDirectory, LookupError};

use super::types::{lookup_error_from_response, StripeCustomer};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Per-attempt deadline.
    timeout: Duration,

    /// Extra attempts after the first for retryable failures.
    max_retries: u32,

    /// Delay before each retry.
    retry_backoff: Duration,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

impl StripeConfig {
    /// Create a new Stripe configuration with production defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 1,
            retry_backoff: Duration::from_millis(200),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }
}

/// Stripe-backed customer directory.
pub struct StripeCustomerDirectory {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeCustomerDirectory {
    /// Create a new adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a provider error if the HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("checkout-webhook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Runs `call` until it succeeds, fails permanently, or retries run out.
    async fn with_retry<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, LookupError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.retryable && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff;
                    tracing::warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Stripe call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(operation, attempts = attempt + 1, error = %err, "Stripe call failed");
                    return Err(err);
                }
            }
        }
    }

    async fn fetch_customer(&self, customer_id: &str) -> Result<Customer, LookupError> {
        let url = format!("{}/v1/customers/{}", self.config.api_base_url, customer_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(lookup_error_from_response(status, &error_text));
        }

        let stripe_customer: StripeCustomer = response.json().await.map_err(body_error)?;

        if stripe_customer.deleted {
            return Err(LookupError::not_found(&format!("Customer {}", customer_id)));
        }

        Ok(stripe_customer.into_customer(None))
    }

    async fn post_customer(&self, request: &CreateCustomerRequest) -> Result<Customer, LookupError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);

        let mut builder = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("email", request.email.as_str())]);
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(lookup_error_from_response(status, &error_text));
        }

        let stripe_customer: StripeCustomer = response.json().await.map_err(body_error)?;

        Ok(stripe_customer.into_customer(Some(request.email.clone())))
    }
}

/// Stripe IDs are `prefix_alphanumeric`; anything else never reaches the URL.
fn is_valid_customer_id(customer_id: &str) -> bool {
    !customer_id.is_empty()
        && customer_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::timeout(format!("Stripe request timed out: {}", err))
    } else {
        LookupError::network(err.to_string())
    }
}

/// Failures while reading a success body: only a decode failure is Stripe's fault.
fn body_error(err: reqwest::Error) -> LookupError {
    if err.is_decode() {
        LookupError::provider(format!("Failed to parse Stripe response: {}", err))
    } else {
        transport_error(err)
    }
}

#[async_trait]
impl CustomerDirectory for StripeCustomerDirectory {
    async fn lookup_customer(&self, customer_id: &str) -> Result<Customer, LookupError> {
        if !is_valid_customer_id(customer_id) {
            return Err(LookupError::invalid_request(format!(
                "Invalid customer reference: {:?}",
                customer_id
            )));
        }

        let customer = self
            .with_retry("lookup_customer", || self.fetch_customer(customer_id))
            .await?;

        tracing::debug!(customer_id = %customer.id, "Fetched Stripe customer");
        Ok(customer)
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, LookupError> {
        let customer = self
            .with_retry("create_customer", || self.post_customer(&request))
            .await?;

        tracing::info!(customer_id = %customer.id, "Created Stripe customer");
        Ok(customer)
    }
}
