//! HTTP adapters - REST API implementations.
//!
//! - `webhook` - Webhook and customer endpoints
//! - `router` - Middleware stack, static assets and server startup

pub mod router;
pub mod webhook;

pub use router::{build_router, serve, RouterOptions};
pub use webhook::{webhook_routes, WebhookAppState};
