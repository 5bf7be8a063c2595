//! Stripe API object types used by the customer directory.
//!
//! These mirror the JSON Stripe returns from `/v1/customers` and its error
//! envelope. Only the fields this service reads are captured.

use serde::{Deserialize, Serialize};

use crate::ports::{Customer, LookupError, LookupErrorCode};

/// Stripe Customer object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomer {
    /// Unique customer identifier (cus_...).
    pub id: String,

    /// Object type (always "customer").
    #[serde(default)]
    pub object: String,

    /// Customer email address.
    pub email: Option<String>,

    /// Customer name.
    pub name: Option<String>,

    /// Unix timestamp of creation. Absent on deleted customers.
    #[serde(default)]
    pub created: i64,

    /// Whether the customer has been deleted.
    #[serde(default)]
    pub deleted: bool,
}

impl StripeCustomer {
    /// Converts to the port type, falling back to `fallback_email` when Stripe has none.
    ///
    /// Blank addresses are treated as missing.
    pub fn into_customer(self, fallback_email: Option<String>) -> Customer {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .or(fallback_email)
            .filter(|e| !e.trim().is_empty());
        Customer {
            id: self.id,
            email,
            name: self.name,
            created_at: self.created,
        }
    }
}

/// Error envelope returned by the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

/// Stripe API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Error category (e.g. "invalid_request_error").
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    /// Short machine-readable code (e.g. "resource_missing").
    pub code: Option<String>,

    /// Human-readable message.
    pub message: Option<String>,
}

/// Maps a non-success Stripe response to a `LookupError`.
///
/// `body` is the raw response text; when it is a Stripe error envelope its
/// message and code are carried over.
pub fn lookup_error_from_response(status: reqwest::StatusCode, body: &str) -> LookupError {
    let code = match status.as_u16() {
        400 | 402 | 409 => LookupErrorCode::InvalidRequest,
        401 | 403 => LookupErrorCode::AuthenticationError,
        404 => LookupErrorCode::NotFound,
        429 => LookupErrorCode::RateLimitExceeded,
        _ => LookupErrorCode::ProviderError,
    };

    let parsed = serde_json::from_str::<StripeErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status));

    let error = LookupError::new(code, message);
    match parsed.and_then(|b| b.error.code.or(b.error.error_type)) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}
