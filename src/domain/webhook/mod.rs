//! Webhook domain - verification and classification of Stripe events.
//!
//! - `verifier` authenticates raw deliveries and yields [`WebhookEvent`]s
//! - `field_path` probes the free-form event object without panicking
//! - `classifier` turns a verified event into a [`ClassificationOutcome`]

mod classifier;
mod errors;
mod event;
mod field_path;
mod verifier;

pub use classifier::{ClassificationOutcome, EventClassifier, DEFAULT_PRODUCT_LABEL};
pub use errors::VerificationError;
pub use event::{WebhookEvent, WebhookEventData, CHECKOUT_SESSION_COMPLETED};
pub use field_path::{get_path, is_present, FieldPath, PathSegment};
pub use verifier::{signature_header_for, SignatureHeader, WebhookVerifier, DEFAULT_TOLERANCE_SECS};
