//! Mock customer directory for testing.
//!
//! Provides a configurable in-memory implementation of `CustomerDirectory` for
//! unit and integration tests. Supports:
//! - Pre-configured customers
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateCustomerRequest, Customer, CustomerDirectory, LookupError};

/// Mock customer directory for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockCustomerDirectory::new();
/// mock.add_customer(Customer { id: "cus_123".into(), ... });
/// mock.set_error(LookupError::timeout("slow"));
/// assert_eq!(mock.call_count(), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockCustomerDirectory {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Pre-configured customers by ID.
    customers: HashMap<String, Customer>,

    /// Error to return on next call.
    next_error: Option<LookupError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Counter for generated customer IDs.
    created: u32,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.state().customers.insert(id, customer);
    }

    /// Fail the next call with `error`.
    pub fn set_error(&self, error: LookupError) {
        self.state().next_error = Some(error);
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().call_log.len()
    }

    /// Number of calls to the named method.
    pub fn calls_to(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CustomerDirectory for MockCustomerDirectory {
    async fn lookup_customer(&self, customer_id: &str) -> Result<Customer, LookupError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: "lookup_customer".to_string(),
            args: vec![customer_id.to_string()],
        });

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state
            .customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found(&format!("Customer {}", customer_id)))
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, LookupError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: "create_customer".to_string(),
            args: vec![request.email.clone()],
        });

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.created += 1;
        let customer = Customer {
            id: format!("cus_mock_{}", state.created),
            email: Some(request.email),
            name: None,
            created_at: chrono::Utc::now().timestamp(),
        };
        state.customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::LookupErrorCode;

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            email: Some(format!("{}@example.com", id)),
            name: None,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn lookup_returns_added_customer() {
        let mock = MockCustomerDirectory::new();
        mock.add_customer(customer("cus_1"));

        let found = mock.lookup_customer("cus_1").await.unwrap();

        assert_eq!(found.email.as_deref(), Some("cus_1@example.com"));
        assert_eq!(mock.calls_to("lookup_customer"), 1);
    }

    #[tokio::test]
    async fn lookup_unknown_is_not_found() {
        let mock = MockCustomerDirectory::new();

        let err = mock.lookup_customer("cus_missing").await.unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NotFound);
    }

    #[tokio::test]
    async fn injected_error_applies_once() {
        let mock = MockCustomerDirectory::new();
        mock.add_customer(customer("cus_1"));
        mock.set_error(LookupError::network("connection reset"));

        assert!(mock.lookup_customer("cus_1").await.is_err());
        assert!(mock.lookup_customer("cus_1").await.is_ok());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn created_customers_become_lookupable() {
        let mock = MockCustomerDirectory::new();

        let created = mock
            .create_customer(CreateCustomerRequest {
                email: "new@example.com".to_string(),
                idempotency_key: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, "cus_mock_1");
        let found = mock.lookup_customer(&created.id).await.unwrap();
        assert_eq!(found.email.as_deref(), Some("new@example.com"));
        assert_eq!(
            mock.calls()[0],
            MethodCall {
                method: "create_customer".to_string(),
                args: vec!["new@example.com".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let mock = MockCustomerDirectory::new();
        let clone = mock.clone();
        clone.add_customer(customer("cus_1"));

        assert!(mock.lookup_customer("cus_1").await.is_ok());
        assert_eq!(clone.call_count(), 1);
    }
}
