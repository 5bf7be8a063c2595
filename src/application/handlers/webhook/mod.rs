//! Webhook handlers.
//!
//! ## Commands
//! - Verifying and classifying Stripe webhook deliveries
//! - Creating Stripe customers

mod create_customer;
mod handle_webhook;

pub use create_customer::{CreateCustomerCommand, CreateCustomerError, CreateCustomerHandler};
pub use handle_webhook::{HandleWebhookCommand, HandleWebhookError, HandleWebhookHandler};
