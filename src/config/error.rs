//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Webhook tolerance must be between 1 and 3600 seconds")]
    InvalidWebhookTolerance,

    #[error("Invalid Stripe API base URL: {0}")]
    InvalidApiBaseUrl(String),

    #[error("Lookup timeout must be between 1 and 60 seconds")]
    InvalidLookupTimeout,

    #[error("Lookup retries must be at most 3")]
    TooManyLookupRetries,

    #[error(
        "Worst-case customer lookup ({lookup_ms} ms) must finish within the request timeout ({request_ms} ms)"
    )]
    LookupExceedsRequestTimeout { lookup_ms: u128, request_ms: u128 },

    #[error("Product label must not be blank")]
    EmptyProductLabel,

    #[error("Static files directory does not exist: {0}")]
    StaticDirNotFound(PathBuf),
}
