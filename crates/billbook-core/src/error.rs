//! # Error Types
//!
//! Domain-specific error types for billbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billbook-core errors (this file)                                      │
//! │  ├── CoreError        - Billing computation failures                   │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  config errors (config.rs)                                             │
//! │  └── ConfigError      - Bad configuration values                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidBillInput → form layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Name the offending field (`items[1].quantity`) so forms can highlight it
//! 3. Errors are enum variants, never String
//! 4. No partial totals are ever returned alongside an error

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Billing engine errors.
///
/// Raised synchronously by the computation engine and propagated unmodified
/// through aggregation. None of them are transient, so there is nothing to
/// retry: the bill data has to be fixed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The bill violates an input rule (empty items, negative rate,
    /// non-positive quantity, negative GST rate, ...).
    ///
    /// ## User Workflow
    /// ```text
    /// Bill form submits items: [{ rate: 100, quantity: 0 }]
    ///      │
    ///      ▼
    /// compute_totals
    ///      │
    ///      ▼
    /// InvalidBillInput(MustBePositive { field: "items[0].quantity" })
    ///      │
    ///      ▼
    /// UI highlights the quantity field of row 1
    /// ```
    #[error("Invalid bill input: {0}")]
    InvalidBillInput(#[from] ValidationError),

    /// An amount left the range of i64 minor units.
    #[error("Amount overflow while computing {field}")]
    AmountOverflow { field: String },

    /// Persisted totals disagree with a replay of the computation.
    ///
    /// ## When This Occurs
    /// - A row was edited without recomputing its totals
    /// - Totals were produced by some other formula (e.g. float math)
    #[error("Stored {component} for bill {bill_number} is stale: stored {stored}, computed {computed}")]
    TotalsMismatch {
        bill_number: String,
        /// `subtotal`, `tax_amount` or `total`.
        component: &'static str,
        stored: Money,
        computed: Money,
    },
}

impl CoreError {
    pub(crate) fn overflow(field: &str) -> Self {
        CoreError::AmountOverflow {
            field: field.to_string(),
        }
    }

    /// Returns the field-level validation failure, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CoreError::InvalidBillInput(err) => Some(err),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is a path into the bill (`gst_rate`, `items`, `items[2].rate`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must hold at least one element is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be at least one.
    #[error("{field} must be at least 1")]
    MustBePositive { field: String },

    /// Collection is longer than allowed.
    #[error("{field} must contain at most {max} entries")]
    TooMany { field: String, max: usize },

    /// Invalid format (e.g., unparseable amount or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// The field path this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Empty { field }
            | ValidationError::Negative { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::TooMany { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TotalsMismatch {
            bill_number: "INV-1001".to_string(),
            component: "total",
            stored: Money::from_cents(991_100),
            computed: Money::from_cents(991_200),
        };
        assert_eq!(
            err.to_string(),
            "Stored total for bill INV-1001 is stale: stored 9911.00, computed 9912.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "items[0].quantity".to_string(),
        };
        assert_eq!(err.to_string(), "items[0].quantity must be at least 1");

        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one entry");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Negative {
            field: "gst_rate".to_string(),
        };
        let core_err: CoreError = validation_err.clone().into();
        assert!(matches!(core_err, CoreError::InvalidBillInput(_)));
        assert_eq!(core_err.validation(), Some(&validation_err));
        assert_eq!(validation_err.field(), "gst_rate");
    }
}
