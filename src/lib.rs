//! Checkout Webhook - Stripe checkout fulfillment service
//!
//! This crate receives signed Stripe webhook deliveries, verifies them, and
//! decides whether a completed checkout included the e-book so it can be
//! delivered to the customer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
