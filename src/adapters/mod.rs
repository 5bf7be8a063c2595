//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum endpoints
//! - `stripe` - Stripe customer directory (plus an in-memory mock)

pub mod http;
pub mod stripe;
