//! Customer directory port for the payment provider's customer records.
//!
//! The payment provider is the system of record for customers. This port is
//! the narrow capability the webhook flow needs: look a customer up by
//! reference, or create one from an email address.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for remote customer records.
///
/// Implementations must bound every call in time and report timeouts as
/// [`LookupErrorCode::Timeout`] rather than hanging the request.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Fetch a customer by provider ID.
    ///
    /// A customer that does not exist (or was deleted) is a
    /// [`LookupErrorCode::NotFound`] error.
    async fn lookup_customer(&self, customer_id: &str) -> Result<Customer, LookupError>;

    /// Create a customer in the payment system.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, LookupError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer email address.
    pub email: String,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Customer in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,

    /// Customer email, when the provider has one on record.
    pub email: Option<String>,

    /// Customer name.
    pub name: Option<String>,

    /// When the customer was created (provider timestamp).
    pub created_at: i64,
}

/// Errors from remote customer operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupError {
    /// Error code for categorization.
    pub code: LookupErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl LookupError {
    /// Create a new lookup error.
    pub fn new(code: LookupErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::Timeout, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::AuthenticationError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::ProviderError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(LookupErrorCode::NotFound, format!("{} not found", resource))
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for LookupError {}

/// Lookup error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Call did not complete within its deadline.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Request rejected as invalid by the provider (or before sending).
    InvalidRequest,

    /// Provider API error (5xx or unparseable response).
    ProviderError,
}

impl LookupErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LookupErrorCode::NetworkError
                | LookupErrorCode::Timeout
                | LookupErrorCode::RateLimitExceeded
                | LookupErrorCode::ProviderError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupErrorCode::NetworkError => "network_error",
            LookupErrorCode::Timeout => "timeout",
            LookupErrorCode::AuthenticationError => "authentication_error",
            LookupErrorCode::NotFound => "not_found",
            LookupErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            LookupErrorCode::InvalidRequest => "invalid_request",
            LookupErrorCode::ProviderError => "provider_error",
        }
    }
}

impl std::fmt::Display for LookupErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
