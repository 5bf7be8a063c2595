//! Webhook HTTP adapter.
//!
//! Exposes signature-verified Stripe webhook handling and customer creation.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateCustomerBody, CustomerResponse, CustomerView, ErrorResponse, HealthResponse,
    WebhookResponse,
};
pub use handlers::{WebhookApiError, WebhookAppState, SIGNATURE_HEADER};
pub use routes::webhook_routes;
