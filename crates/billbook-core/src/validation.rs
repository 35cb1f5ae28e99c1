//! # Validation Module
//!
//! Input validation for bills before (and while) totals are computed.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Bill form (TypeScript)                                       │
//! │  ├── Basic format checks (empty, min)                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_amounts: rules the totals math depends on               │
//! │  └── validate_bill:    + header fields and descriptions                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence (external)                                       │
//! │  ├── UNIQUE bill numbers                                               │
//! │  └── Customer existence                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator stops at the first failing field and names it.
//!
//! ## Usage
//! ```rust
//! use billbook_core::validation::validate_quantity;
//!
//! assert!(validate_quantity(0, "items[0].quantity").is_err());
//! assert!(validate_quantity(5, "items[0].quantity").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Bill, BillItem, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field (blank counts as missing).
pub fn validate_required(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_quantity(qty: i64, field: &str) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit rate.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free items)
pub fn validate_rate(rate: Money, field: &str) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a GST rate.
///
/// ## Rules
/// - Must be non-negative; no upper bound is imposed
pub fn validate_gst_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::Negative {
            field: "gst_rate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Bill Validators
// =============================================================================

/// Validates what the totals computation depends on: a non-empty item list,
/// non-negative rates, quantities of at least 1, and a non-negative GST rate.
///
/// ## Example
/// ```rust
/// use billbook_core::money::Money;
/// use billbook_core::types::{BillItem, TaxRate};
/// use billbook_core::validation::validate_amounts;
///
/// let items = vec![BillItem::new("Steel Rods", Money::from_major(1200), 5)];
/// assert!(validate_amounts(&items, TaxRate::from_percent(18)).is_ok());
/// assert!(validate_amounts(&[], TaxRate::from_percent(18)).is_err());
/// ```
pub fn validate_amounts(items: &[BillItem], gst_rate: TaxRate) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for (idx, item) in items.iter().enumerate() {
        validate_rate(item.rate, &format!("items[{}].rate", idx))?;
        validate_quantity(item.quantity, &format!("items[{}].quantity", idx))?;
    }

    validate_gst_rate(gst_rate)
}

/// Validates a complete bill: header fields, item descriptions, item count,
/// then every rule of [`validate_amounts`].
///
/// `max_items` comes from [`crate::config::BillingConfig::max_line_items`].
pub fn validate_bill_with(bill: &Bill, max_items: usize) -> ValidationResult<()> {
    validate_required(&bill.bill_number, "bill_number")?;
    validate_required(&bill.customer_reference, "customer_reference")?;

    if bill.items.len() > max_items {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: max_items,
        });
    }

    for (idx, item) in bill.items.iter().enumerate() {
        validate_required(&item.description, &format!("items[{}].description", idx))?;
    }

    validate_amounts(&bill.items, bill.gst_rate)
}

/// [`validate_bill_with`] using the default line-item limit.
pub fn validate_bill(bill: &Bill) -> ValidationResult<()> {
    validate_bill_with(bill, crate::DEFAULT_MAX_LINE_ITEMS)
}

// =============================================================================
// Unit Tests
// =============================================================================
