//! Stripe webhook event envelope.
//!
//! Only the envelope fields are typed. The affected object under `data.object`
//! stays a `serde_json::Value` and is inspected through [`FieldPath`] probes.
//!
//! [`FieldPath`]: super::field_path::FieldPath

use serde::{Deserialize, Serialize};

use super::field_path::{get_path, FieldPath};

/// Event type that carries purchase information.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Verified webhook event.
///
/// Instances are produced by [`WebhookVerifier`](super::WebhookVerifier) after
/// signature verification and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: WebhookEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookEventData {
    /// The object that triggered the event (shape depends on event type).
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Returns true for the only event type the classifier acts on.
    pub fn is_checkout_completed(&self) -> bool {
        self.event_type == CHECKOUT_SESSION_COMPLETED
    }

    /// Customer reference carried by the event object, if any.
    ///
    /// Accepts either the bare ID or an expanded customer object with an `id`.
    /// Blank strings are treated as absent.
    pub fn customer_ref(&self) -> Option<&str> {
        let customer = self.data.object.get("customer")?;
        customer
            .as_str()
            .or_else(|| customer.get("id").and_then(serde_json::Value::as_str))
            .filter(|s| !s.trim().is_empty())
    }

    /// Probes the event object at `path`.
    pub fn object_value(&self, path: &FieldPath) -> Option<&serde_json::Value> {
        get_path(&self.data.object, path.segments())
    }
}

/// Builder for creating test WebhookEvent instances.
#[cfg(test)]
pub struct WebhookEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for WebhookEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: CHECKOUT_SESSION_COMPLETED.to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({ "customer": "cus_test_123" }),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl WebhookEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> WebhookEvent {
        WebhookEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: WebhookEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: None,
        }
    }
}
