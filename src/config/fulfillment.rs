//! Fulfillment configuration

use serde::Deserialize;

use crate::domain::webhook::DEFAULT_PRODUCT_LABEL;

use super::error::ValidationError;

/// What counts as a purchase
#[derive(Debug, Clone, Deserialize)]
pub struct FulfillmentConfig {
    /// Display item name that marks the e-book
    #[serde(default = "default_product_label")]
    pub product_label: String,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            product_label: default_product_label(),
        }
    }
}

impl FulfillmentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_label.trim().is_empty() {
            return Err(ValidationError::EmptyProductLabel);
        }
        Ok(())
    }
}

fn default_product_label() -> String {
    DEFAULT_PRODUCT_LABEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label() {
        assert_eq!(FulfillmentConfig::default().product_label, "Pasha e-book");
        assert!(FulfillmentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_blank_label_rejected() {
        let config = FulfillmentConfig {
            product_label: "  ".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
