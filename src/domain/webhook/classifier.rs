//! Event classifier - decides what a verified checkout event means.
//!
//! ## Decision
//!
//! 1. Anything other than `checkout.session.completed` is `WrongType`; the
//!    customer directory is not consulted.
//! 2. The event's customer is resolved through the [`CustomerDirectory`].
//!    Lookup failures propagate unchanged.
//! 3. `display_items[0].custom` must be present and
//!    `display_items[0].custom.name` must equal the configured product label
//!    for the checkout to count as a purchase.
//! 4. A purchase needs a delivery address. A customer without an email is
//!    reported as a `NotFound` lookup error rather than an empty address.

use serde::Serialize;

use crate::ports::{CustomerDirectory, LookupError};

use super::event::WebhookEvent;
use super::field_path::{is_present, FieldPath};

/// Product label that marks the e-book line item.
pub const DEFAULT_PRODUCT_LABEL: &str = "Pasha e-book";

/// Closed set of classification results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// Verified, but not an event this service acts on.
    WrongType { event_type: String },

    /// Checkout completed without the e-book line item.
    SubscribedNoPurchase,

    /// Checkout completed and included the e-book.
    SubscribedWithPurchase { email: String },
}

impl ClassificationOutcome {
    /// Machine-checkable tag, identical to the serialized `outcome` field.
    pub fn tag(&self) -> &'static str {
        match self {
            ClassificationOutcome::WrongType { .. } => "wrong_type",
            ClassificationOutcome::SubscribedNoPurchase => "subscribed_no_purchase",
            ClassificationOutcome::SubscribedWithPurchase { .. } => "subscribed_with_purchase",
        }
    }

    /// Human-readable summary for operators.
    pub fn message(&self) -> String {
        match self {
            ClassificationOutcome::WrongType { event_type } => {
                format!("Wrong event type: {}", event_type)
            }
            ClassificationOutcome::SubscribedNoPurchase => {
                "Customer is subscribed but did not buy an e-book.".to_string()
            }
            ClassificationOutcome::SubscribedWithPurchase { email } => format!(
                "Customer is subscribed and bought an e-book! Send the e-book to {}",
                email
            ),
        }
    }
}

/// Classifies verified webhook events.
///
/// Holds only immutable configuration, so classifying the same event twice
/// gives the same answer for the same directory contents.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    product_label: String,
    custom_path: FieldPath,
    name_path: FieldPath,
}

impl EventClassifier {
    pub fn new(product_label: impl Into<String>) -> Self {
        let custom_path = FieldPath::root()
            .key("display_items")
            .index(0)
            .key("custom");
        let name_path = custom_path.key("name");
        Self {
            product_label: product_label.into(),
            custom_path,
            name_path,
        }
    }

    pub fn product_label(&self) -> &str {
        &self.product_label
    }

    /// Classifies `event`, resolving its customer through `directory` when needed.
    pub async fn classify(
        &self,
        event: &WebhookEvent,
        directory: &dyn CustomerDirectory,
    ) -> Result<ClassificationOutcome, LookupError> {
        if !event.is_checkout_completed() {
            tracing::debug!(
                event_id = %event.id,
                event_type = %event.event_type,
                "Ignoring event of unexpected type"
            );
            return Ok(ClassificationOutcome::WrongType {
                event_type: event.event_type.clone(),
            });
        }

        let customer_id = event
            .customer_ref()
            .ok_or_else(|| LookupError::invalid_request("Event carries no customer reference"))?;

        let customer = directory.lookup_customer(customer_id).await?;

        if !self.includes_product(event) {
            return Ok(ClassificationOutcome::SubscribedNoPurchase);
        }

        match customer.email {
            Some(email) => Ok(ClassificationOutcome::SubscribedWithPurchase { email }),
            None => {
                tracing::warn!(
                    event_id = %event.id,
                    customer_id = %customer.id,
                    "Purchase detected but customer has no email"
                );
                Err(LookupError::not_found(&format!(
                    "Email address for customer {}",
                    customer.id
                )))
            }
        }
    }

    /// True when the first display item is the configured product.
    pub fn includes_product(&self, event: &WebhookEvent) -> bool {
        if !is_present(&event.data.object, self.custom_path.segments()) {
            return false;
        }
        event
            .object_value(&self.name_path)
            .and_then(serde_json::Value::as_str)
            == Some(self.product_label.as_str())
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_LABEL)
    }
}
