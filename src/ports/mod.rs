//! Ports - interfaces to systems outside this service.
//!
//! - `customer_directory` - Remote customer records held by the payment provider

mod customer_directory;

pub use customer_directory::{
    CreateCustomerRequest, Customer, CustomerDirectory, LookupError, LookupErrorCode,
};
