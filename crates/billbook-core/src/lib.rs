//! # billbook-core: Billing Computation & Monthly Aggregation
//!
//! This crate is the **heart** of billbook. It turns itemized bills into
//! totals and rolls those totals up into monthly reports, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front-end (external)                            │   │
//! │  │   Bill Form ──► Bill List ──► Bill Detail ──► Dashboard         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ bill records in, totals out            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ billbook-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  types   │  │  money   │  │  totals  │  │    report    │   │   │
//! │  │   │  Bill    │  │  Money   │  │ compute_ │  │ aggregate_   │   │   │
//! │  │   │ BillItem │  │ half-up  │  │  totals  │  │  by_month    │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                Persistence (external)                           │   │
//! │  │     stores bills + cached totals, verified via TotaledBill      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, BillItem, TaxRate, BillTotals)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - The single totals computation, drafts, stored-totals checks
//! - [`period`] - Calendar months and bill date parsing
//! - [`report`] - Monthly summaries, chart series, dashboard overview
//! - [`query`] - Bill search and customer filters
//! - [`validation`] - Input rules
//! - [`config`] - Engine configuration
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same bill in, same totals out, on every machine
//! 2. **One Formula**: previews and saved bills share [`totals::compute_totals`]
//! 3. **Integer Money**: all amounts are minor units (i64), rounded once
//! 4. **Explicit Errors**: invalid bills fail with a named field, never a total
//!
//! ## Example Usage
//!
//! ```rust
//! use billbook_core::{Bill, BillItem, Money, PaymentStatus, TaxRate};
//! use billbook_core::report::aggregate_bills;
//! use chrono::NaiveDate;
//!
//! let bill = Bill {
//!     bill_number: "INV-1001".to_string(),
//!     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!     gst_rate: TaxRate::from_percent(18),
//!     items: vec![
//!         BillItem::new("Steel Rods", Money::from_major(1200), 5),
//!         BillItem::new("Nuts & Bolts", Money::from_major(12), 200),
//!     ],
//!     customer_reference: "c_1".to_string(),
//!     payment_status: PaymentStatus::Paid,
//!     payment_method: Some("UPI".to_string()),
//!     notes: None,
//! };
//!
//! let totals = bill.totals().unwrap();
//! assert_eq!(totals.total.format_with("₹"), "₹9912.00");
//!
//! let report = aggregate_bills(&[bill]).unwrap();
//! assert_eq!(report[0].period.key(), "2024-01");
//! assert_eq!(report[0].revenue_total, totals.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod period;
pub mod query;
pub mod report;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{BillingConfig, ConfigError};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use period::Period;
pub use report::{aggregate_bills, aggregate_by_month, Metric, MonthlySummary};
pub use totals::{compute_totals, BillDraft, TotaledBill};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum number of line items on one bill.
///
/// ## Business Reason
/// Guards against runaway imports; overridable through [`BillingConfig`].
pub const DEFAULT_MAX_LINE_ITEMS: usize = 500;
