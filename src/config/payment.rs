//! Payment configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    #[serde(default)]
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    #[serde(default)]
    pub stripe_webhook_secret: String,

    /// Allowed clock skew for signed webhook timestamps, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-attempt deadline for customer calls, in seconds
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// Retries for retryable customer call failures
    #[serde(default = "default_lookup_max_retries")]
    pub lookup_max_retries: u32,

    /// Delay between retries, in milliseconds
    #[serde(default = "default_lookup_retry_backoff")]
    pub lookup_retry_backoff_ms: u64,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("stripe_api_key", &"[REDACTED]")
            .field("stripe_webhook_secret", &"[REDACTED]")
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .field("api_base_url", &self.api_base_url)
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("lookup_max_retries", &self.lookup_max_retries)
            .field("lookup_retry_backoff_ms", &self.lookup_retry_backoff_ms)
            .finish()
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            webhook_tolerance_secs: default_webhook_tolerance(),
            api_base_url: default_api_base_url(),
            lookup_timeout_secs: default_lookup_timeout(),
            lookup_max_retries: default_lookup_max_retries(),
            lookup_retry_backoff_ms: default_lookup_retry_backoff(),
        }
    }
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn lookup_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.lookup_retry_backoff_ms)
    }

    /// Longest a single customer call can take with every retry used.
    pub fn worst_case_lookup(&self) -> Duration {
        let attempts = self.lookup_max_retries.saturating_add(1);
        self.lookup_timeout()
            .saturating_mul(attempts)
            .saturating_add(self.lookup_retry_backoff().saturating_mul(self.lookup_max_retries))
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if !(1..=3600).contains(&self.webhook_tolerance_secs) {
            return Err(ValidationError::InvalidWebhookTolerance);
        }
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(ValidationError::InvalidApiBaseUrl(self.api_base_url.clone()));
        }
        if !(1..=60).contains(&self.lookup_timeout_secs) {
            return Err(ValidationError::InvalidLookupTimeout);
        }
        if self.lookup_max_retries > 3 {
            return Err(ValidationError::TooManyLookupRetries);
        }

        Ok(())
    }
}

fn default_webhook_tolerance() -> i64 {
    300
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_lookup_timeout() -> u64 {
    10
}

fn default_lookup_max_retries() -> u32 {
    1
}

fn default_lookup_retry_backoff() -> u64 {
    200
}
