//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod webhook;

pub use webhook::{
    CreateCustomerCommand, CreateCustomerError, CreateCustomerHandler, HandleWebhookCommand,
    HandleWebhookError, HandleWebhookHandler,
};
