//! Error types for billing computations.

use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Failures local to a single billing computation.
#[derive(Debug, Error)]
pub enum BillingError {
    /// No invoice history exists for the restaurant, so there is no cycle to read.
    #[error("No invoices found for restaurant {restaurant_id}")]
    NotFound { restaurant_id: Uuid },

    /// Plan validity, custom duration or trial length cannot produce a period.
    #[error("Invalid subscription duration: {0}")]
    InvalidDuration(String),

    /// LUT declared alongside one or more GST components.
    #[error("LUT cannot be combined with GST components ({components})")]
    InconsistentTaxConfiguration { components: String },

    /// Payment rejected by the cycle's running-total guard.
    #[error("Payment of {amount} rejected: {reason}")]
    InvalidPayment { amount: Decimal, reason: String },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl BillingError {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingError::NotFound { .. } => "not_found",
            BillingError::InvalidDuration(_) => "invalid_duration",
            BillingError::InconsistentTaxConfiguration { .. } => "inconsistent_tax_configuration",
            BillingError::InvalidPayment { .. } => "invalid_payment",
            BillingError::Validation(_) => "validation_error",
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotFound { .. } => AppError::NotFound(anyhow::Error::new(err)),
            BillingError::InvalidPayment { .. } => AppError::Conflict(anyhow::Error::new(err)),
            BillingError::Validation(errors) => AppError::ValidationError(errors),
            _ => AppError::BadRequest(anyhow::Error::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_into_app_error() {
        let err = BillingError::NotFound {
            restaurant_id: Uuid::nil(),
        };
        assert_eq!(err.as_str(), "not_found");
        assert_eq!(AppError::from(err).kind(), "not_found");

        let err = BillingError::InvalidPayment {
            amount: Decimal::from(500),
            reason: "cycle is already settled".to_string(),
        };
        assert_eq!(AppError::from(err).kind(), "conflict");

        let err = BillingError::InvalidDuration("validity must be at least one month".to_string());
        assert_eq!(AppError::from(err).kind(), "bad_request");
    }
}
