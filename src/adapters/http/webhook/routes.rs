//! Axum router configuration for webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_customer, handle_webhook, health, WebhookAppState};

/// Create the webhook API router.
///
/// # Routes
///
/// - `POST /webhook` - Handle Stripe webhooks (signature verified)
/// - `POST /create-customer` - Create a Stripe customer
/// - `GET /health` - Liveness probe
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/create-customer", post(create_customer))
        .route("/health", get(health))
}
