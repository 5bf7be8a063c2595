//! Stripe customer directory adapter.
//!
//! Implements the `CustomerDirectory` port for Stripe, including:
//! - Customer retrieval for classification
//! - Customer creation with idempotency keys
//!
//! # Security
//!
//! - The API key is held in `secrecy::SecretString` and redacted from `Debug`
//! - Customer references are validated before being placed in a URL
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CHECKOUT_WEBHOOK__PAYMENT__STRIPE_API_KEY`: Stripe secret API key

mod customer_directory;
mod mock_customer_directory;
mod types;

pub use customer_directory::{StripeConfig, StripeCustomerDirectory};
pub use mock_customer_directory::{MethodCall, MockCustomerDirectory};
pub use types::{lookup_error_from_response, StripeApiError, StripeCustomer, StripeErrorBody};
