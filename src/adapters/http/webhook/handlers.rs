//! HTTP handlers for webhook and customer endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::handlers::webhook::{
    CreateCustomerCommand, CreateCustomerError, CreateCustomerHandler, HandleWebhookCommand,
    HandleWebhookError, HandleWebhookHandler,
};
use crate::domain::webhook::{
    ClassificationOutcome, EventClassifier, VerificationError, WebhookVerifier,
};
use crate::ports::{CustomerDirectory, LookupError, LookupErrorCode};

use super::dto::{
    CreateCustomerBody, CustomerResponse, CustomerView, ErrorResponse, HealthResponse,
    WebhookResponse,
};

/// Header Stripe signs deliveries with.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; the directory is shared behind an `Arc`.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: WebhookVerifier,
    pub classifier: EventClassifier,
    pub customer_directory: Arc<dyn CustomerDirectory>,
}

impl WebhookAppState {
    pub fn new(
        verifier: WebhookVerifier,
        classifier: EventClassifier,
        customer_directory: Arc<dyn CustomerDirectory>,
    ) -> Self {
        Self {
            verifier,
            classifier,
            customer_directory,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        HandleWebhookHandler::new(
            self.verifier.clone(),
            self.classifier.clone(),
            self.customer_directory.clone(),
        )
    }

    pub fn create_customer_handler(&self) -> CreateCustomerHandler {
        CreateCustomerHandler::new(self.customer_directory.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Verify and classify a Stripe delivery
pub async fn handle_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    if body.is_empty() {
        return Err(WebhookApiError::Verification(VerificationError::EmptyBody));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookApiError::MissingSignature)?;

    let handler = state.webhook_handler();
    let cmd = HandleWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    let outcome = handler.handle(cmd).await?;

    if let ClassificationOutcome::WrongType { event_type } = outcome {
        return Err(WebhookApiError::WrongType { event_type });
    }

    Ok(Json(WebhookResponse::from(outcome)))
}

/// POST /create-customer - Create a Stripe customer
pub async fn create_customer(
    State(state): State<WebhookAppState>,
    body: Result<Json<CreateCustomerBody>, JsonRejection>,
) -> Result<impl IntoResponse, WebhookApiError> {
    let Json(request) = body.map_err(|e| WebhookApiError::InvalidBody(e.body_text()))?;

    let handler = state.create_customer_handler();
    let cmd = CreateCustomerCommand {
        email: request.email,
    };

    let customer = handler.handle(cmd).await?;

    Ok(Json(CustomerResponse {
        customer: CustomerView::from(customer),
    }))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts request failures to HTTP responses.
///
/// Every failure is reported as `400 Bad Request`.
#[derive(Debug)]
pub enum WebhookApiError {
    MissingSignature,
    InvalidBody(String),
    Verification(VerificationError),
    WrongType { event_type: String },
    Lookup(LookupError),
    Validation { field: String, message: String },
}

impl From<HandleWebhookError> for WebhookApiError {
    fn from(err: HandleWebhookError) -> Self {
        match err {
            HandleWebhookError::Verification(e) => Self::Verification(e),
            HandleWebhookError::Lookup(e) => Self::Lookup(e),
        }
    }
}

impl From<CreateCustomerError> for WebhookApiError {
    fn from(err: CreateCustomerError) -> Self {
        match err {
            CreateCustomerError::Validation { field, message } => {
                Self::Validation { field, message }
            }
            CreateCustomerError::Lookup(e) => Self::Lookup(e),
        }
    }
}

fn lookup_error_code(code: LookupErrorCode) -> &'static str {
    match code {
        LookupErrorCode::NotFound => "CUSTOMER_NOT_FOUND",
        LookupErrorCode::AuthenticationError => "PAYMENT_PROVIDER_UNAUTHORIZED",
        LookupErrorCode::Timeout => "PAYMENT_PROVIDER_TIMEOUT",
        LookupErrorCode::NetworkError => "PAYMENT_PROVIDER_UNREACHABLE",
        LookupErrorCode::RateLimitExceeded => "PAYMENT_PROVIDER_RATE_LIMITED",
        LookupErrorCode::InvalidRequest => "INVALID_CUSTOMER_REQUEST",
        LookupErrorCode::ProviderError => "PAYMENT_PROVIDER_ERROR",
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            WebhookApiError::MissingSignature => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "MISSING_SIGNATURE_HEADER",
                    format!("Missing {} header", SIGNATURE_HEADER),
                ),
            ),
            WebhookApiError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_REQUEST_BODY", message),
            ),
            WebhookApiError::Verification(err) => {
                tracing::warn!(error_code = err.code(), error = %err, "Webhook rejected");
                (err.status_code(), ErrorResponse::new(err.code(), err.to_string()))
            }
            WebhookApiError::WrongType { event_type } => {
                let outcome = ClassificationOutcome::WrongType { event_type };
                let message = outcome.message();
                let details = serde_json::to_value(&outcome).unwrap_or_else(|_| json!({}));
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("WRONG_EVENT_TYPE", message, details),
                )
            }
            WebhookApiError::Lookup(err) => {
                let details = json!({
                    "code": err.code.as_str(),
                    "provider_code": err.provider_code,
                    "retryable": err.retryable,
                });
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(lookup_error_code(err.code), err.message, details),
                )
            }
            WebhookApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("VALIDATION_FAILED", message, json!({ "field": field })),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: WebhookApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn wrong_type_is_bad_request_with_details() {
        let (status, body) = render(WebhookApiError::WrongType {
            event_type: "invoice.paid".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "WRONG_EVENT_TYPE");
        assert_eq!(body["message"], "Wrong event type: invoice.paid");
        assert_eq!(body["details"]["outcome"], "wrong_type");
        assert_eq!(body["details"]["event_type"], "invoice.paid");
    }

    #[tokio::test]
    async fn verification_errors_use_their_code() {
        let (status, body) = render(WebhookApiError::Verification(
            VerificationError::SignatureMismatch,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "SIGNATURE_MISMATCH");
    }

    #[tokio::test]
    async fn lookup_errors_are_bad_request() {
        let (status, body) = render(WebhookApiError::Lookup(LookupError::timeout("slow"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "PAYMENT_PROVIDER_TIMEOUT");
        assert_eq!(body["details"]["code"], "timeout");
        assert_eq!(body["details"]["retryable"], true);
    }

    #[tokio::test]
    async fn validation_error_names_field() {
        let (status, body) = render(WebhookApiError::Validation {
            field: "email".to_string(),
            message: "email is required".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "email");
    }

    #[test]
    fn every_lookup_code_has_a_distinct_api_code() {
        let codes = [
            LookupErrorCode::NetworkError,
            LookupErrorCode::Timeout,
            LookupErrorCode::AuthenticationError,
            LookupErrorCode::NotFound,
            LookupErrorCode::RateLimitExceeded,
            LookupErrorCode::InvalidRequest,
            LookupErrorCode::ProviderError,
        ];
        let mapped: std::collections::HashSet<_> =
            codes.iter().map(|c| lookup_error_code(*c)).collect();
        assert_eq!(mapped.len(), codes.len());
    }
}
