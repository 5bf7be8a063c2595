//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Signature verification, event model and purchase classification

pub mod webhook;
