//! Data Transfer Objects for webhook and customer endpoints.
//!
//! These types define the JSON shapes for HTTP requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::webhook::ClassificationOutcome;
use crate::ports::Customer;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerBody {
    #[serde(default)]
    pub email: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful classification of a webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Machine-checkable outcome tag.
    pub outcome: String,
    /// Customer email, present only for purchases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Human-readable summary.
    pub message: String,
}

impl From<ClassificationOutcome> for WebhookResponse {
    fn from(outcome: ClassificationOutcome) -> Self {
        let message = outcome.message();
        let tag = outcome.tag().to_string();
        let email = match outcome {
            ClassificationOutcome::SubscribedWithPurchase { email } => Some(email),
            _ => None,
        };
        Self {
            outcome: tag,
            email,
            message,
        }
    }
}

/// Customer view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created: i64,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email,
            name: customer.name,
            created: customer.created_at,
        }
    }
}

/// Wrapper returned by `POST /create-customer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub customer: CustomerView,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn purchase_response_carries_email() {
        let response = WebhookResponse::from(ClassificationOutcome::SubscribedWithPurchase {
            email: "a@x.com".to_string(),
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["outcome"], "subscribed_with_purchase");
        assert_eq!(value["email"], "a@x.com");
        assert!(value["message"].as_str().unwrap().contains("a@x.com"));
    }

    #[test]
    fn no_purchase_response_omits_email() {
        let response = WebhookResponse::from(ClassificationOutcome::SubscribedNoPurchase);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["outcome"], "subscribed_no_purchase");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn customer_response_shape() {
        let response = CustomerResponse {
            customer: CustomerView::from(Customer {
                id: "cus_1".to_string(),
                email: Some("a@x.com".to_string()),
                name: None,
                created_at: 1704067200,
            }),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"customer": {"id": "cus_1", "email": "a@x.com", "created": 1704067200}})
        );
    }

    #[test]
    fn create_customer_body_tolerates_missing_email() {
        let body: CreateCustomerBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.email, "");
    }

    #[test]
    fn error_response_omits_absent_details() {
        let value = serde_json::to_value(ErrorResponse::new("EMPTY_BODY", "empty")).unwrap();
        assert!(value.get("details").is_none());
    }
}
