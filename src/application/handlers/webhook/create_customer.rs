//! CreateCustomerHandler - Command handler for creating Stripe customers.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{CreateCustomerRequest, Customer, CustomerDirectory, LookupError};

/// Command to create a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateCustomerError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("customer creation failed: {0}")]
    Lookup(#[from] LookupError),
}

impl CreateCustomerError {
    fn invalid_email(message: impl Into<String>) -> Self {
        Self::Validation {
            field: "email".to_string(),
            message: message.into(),
        }
    }
}

/// Handler for creating customers in the payment system.
pub struct CreateCustomerHandler {
    directory: Arc<dyn CustomerDirectory>,
}

impl CreateCustomerHandler {
    pub fn new(directory: Arc<dyn CustomerDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self, cmd: CreateCustomerCommand) -> Result<Customer, CreateCustomerError> {
        let email = validate_email(&cmd.email)?;

        let request = CreateCustomerRequest {
            email: email.to_string(),
            idempotency_key: Some(Uuid::new_v4().to_string()),
        };

        let customer = self.directory.create_customer(request).await?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }
}

/// Returns the trimmed address when it has exactly one `@` with both sides non-empty.
fn validate_email(raw: &str) -> Result<&str, CreateCustomerError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CreateCustomerError::invalid_email("email is required"));
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(CreateCustomerError::invalid_email(
            "email must look like name@domain",
        )),
    }
}
