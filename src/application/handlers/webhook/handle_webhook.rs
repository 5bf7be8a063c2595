//! HandleWebhookHandler - Command handler for Stripe webhook deliveries.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::webhook::{
    ClassificationOutcome, EventClassifier, VerificationError, WebhookVerifier,
};
use crate::ports::{CustomerDirectory, LookupError};

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// Why a delivery was not classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleWebhookError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("customer lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Handler for Stripe webhook deliveries.
///
/// Verifies authenticity first; nothing is parsed or looked up for a
/// delivery that fails verification.
pub struct HandleWebhookHandler {
    verifier: WebhookVerifier,
    classifier: EventClassifier,
    directory: Arc<dyn CustomerDirectory>,
}

impl HandleWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        classifier: EventClassifier,
        directory: Arc<dyn CustomerDirectory>,
    ) -> Self {
        Self {
            verifier,
            classifier,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<ClassificationOutcome, HandleWebhookError> {
        // 1. Verify signature and parse event
        let event = self.verifier.verify(&cmd.payload, &cmd.signature)?;

        // 2. Classify
        let outcome = self
            .classifier
            .classify(&event, self.directory.as_ref())
            .await
            .map_err(|err| {
                tracing::warn!(
                    event_id = %event.id,
                    error_code = %err.code,
                    error = %err.message,
                    "Customer lookup failed"
                );
                err
            })?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            outcome = outcome.tag(),
            "{}",
            outcome.message()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockCustomerDirectory;
    use crate::domain::webhook::signature_header_for;
    use crate::ports::{Customer, LookupErrorCode};
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    fn handler(directory: MockCustomerDirectory) -> HandleWebhookHandler {
        HandleWebhookHandler::new(
            WebhookVerifier::new(SECRET, 300),
            EventClassifier::default(),
            Arc::new(directory),
        )
    }

    fn signed(payload: serde_json::Value) -> HandleWebhookCommand {
        let payload = serde_json::to_vec(&payload).unwrap();
        let signature = signature_header_for(SECRET, chrono::Utc::now().timestamp(), &payload);
        HandleWebhookCommand { payload, signature }
    }

    fn checkout(object: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": object }
        })
    }

    fn directory_with(id: &str, email: &str) -> MockCustomerDirectory {
        let directory = MockCustomerDirectory::new();
        directory.add_customer(Customer {
            id: id.to_string(),
            email: Some(email.to_string()),
            name: None,
            created_at: 0,
        });
        directory
    }

    #[tokio::test]
    async fn purchase_is_classified_with_email() {
        let directory = directory_with("cus_1", "a@x.com");
        let cmd = signed(checkout(json!({
            "customer": "cus_1",
            "display_items": [{ "custom": { "name": "Pasha e-book" } }]
        })));

        let outcome = handler(directory.clone()).handle(cmd).await.unwrap();

        assert_eq!(
            outcome,
            ClassificationOutcome::SubscribedWithPurchase {
                email: "a@x.com".to_string()
            }
        );
        assert_eq!(directory.calls_to("lookup_customer"), 1);
    }

    #[tokio::test]
    async fn subscription_without_product() {
        let directory = directory_with("cus_1", "a@x.com");
        let cmd = signed(checkout(json!({ "customer": "cus_1", "display_items": [] })));

        let outcome = handler(directory).handle(cmd).await.unwrap();

        assert_eq!(outcome, ClassificationOutcome::SubscribedNoPurchase);
    }

    #[tokio::test]
    async fn bad_signature_never_reaches_directory() {
        let directory = MockCustomerDirectory::new();
        let mut cmd = signed(checkout(json!({ "customer": "cus_1" })));
        cmd.signature = signature_header_for("whsec_other", chrono::Utc::now().timestamp(), &cmd.payload);

        let err = handler(directory.clone()).handle(cmd).await.unwrap_err();

        assert_eq!(
            err,
            HandleWebhookError::Verification(VerificationError::SignatureMismatch)
        );
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn lookup_failure_is_surfaced() {
        let directory = MockCustomerDirectory::new();
        directory.set_error(LookupError::timeout("deadline exceeded"));
        let cmd = signed(checkout(json!({ "customer": "cus_1" })));

        let err = handler(directory).handle(cmd).await.unwrap_err();

        match err {
            HandleWebhookError::Lookup(e) => assert_eq!(e.code, LookupErrorCode::Timeout),
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn other_event_types_are_wrong_type() {
        let directory = MockCustomerDirectory::new();
        let cmd = signed(json!({
            "id": "evt_2",
            "type": "invoice.paid",
            "data": { "object": {} }
        }));

        let outcome = handler(directory.clone()).handle(cmd).await.unwrap();

        assert_eq!(
            outcome,
            ClassificationOutcome::WrongType {
                event_type: "invoice.paid".to_string()
            }
        );
        assert_eq!(directory.call_count(), 0);
    }
}
