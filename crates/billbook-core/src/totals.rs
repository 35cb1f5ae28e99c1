//! # Totals Module
//!
//! The one place a bill's subtotal, GST and grand total are computed.
//!
//! ## Single Authoritative Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Bill form (live preview)      BillDraft::preview ─┐                   │
//! │                                                    │                    │
//! │  Detail / print view           Bill::totals ───────┼──► compute_totals │
//! │                                                    │                    │
//! │  Persistence (stored cache)    TotaledBill::from_stored ─┘             │
//! │                                  (replay + compare)                     │
//! │                                                                         │
//! │  No view carries its own formula, so a preview can never disagree      │
//! │  with what was saved.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//! 1. subtotal = Σ rate × quantity (exact, minor units, declared order)
//! 2. tax      = subtotal × gst% / 100, rounded once, half-up, to 0.01
//! 3. total    = subtotal + tax

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::BillingConfig;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Bill, BillItem, BillTotals, PaymentStatus, TaxRate};
use crate::validation::{validate_amounts, validate_bill_with};

// =============================================================================
// Computation
// =============================================================================

/// Computes `{subtotal, tax_amount, total}` for a list of items at a GST rate.
///
/// Fails with [`CoreError::InvalidBillInput`] when the items are empty, any
/// rate is negative, any quantity is below 1, or the GST rate is negative.
/// No partial result is ever returned.
///
/// ## Example
/// ```rust
/// use billbook_core::money::Money;
/// use billbook_core::totals::compute_totals;
/// use billbook_core::types::{BillItem, TaxRate};
///
/// let items = vec![
///     BillItem::new("Steel Rods", Money::from_major(1200), 5),
///     BillItem::new("Nuts & Bolts", Money::from_major(12), 200),
/// ];
/// let totals = compute_totals(&items, TaxRate::from_percent(18)).unwrap();
/// assert_eq!(totals.subtotal.to_string(), "8400.00");
/// assert_eq!(totals.tax_amount.to_string(), "1512.00");
/// assert_eq!(totals.total.to_string(), "9912.00");
/// ```
pub fn compute_totals(items: &[BillItem], gst_rate: TaxRate) -> CoreResult<BillTotals> {
    validate_amounts(items, gst_rate)?;

    let mut subtotal = Money::zero();
    for (idx, item) in items.iter().enumerate() {
        let line = item.amount().ok_or_else(|| CoreError::AmountOverflow {
            field: format!("items[{}]", idx),
        })?;
        subtotal = subtotal
            .checked_add(line)
            .ok_or_else(|| CoreError::overflow("subtotal"))?;
    }

    let tax_amount = subtotal
        .checked_tax(gst_rate)
        .ok_or_else(|| CoreError::overflow("tax_amount"))?;
    let total = subtotal
        .checked_add(tax_amount)
        .ok_or_else(|| CoreError::overflow("total"))?;

    debug!(
        items = items.len(),
        gst_rate = %gst_rate,
        subtotal = %subtotal,
        tax = %tax_amount,
        total = %total,
        "Computed bill totals"
    );

    Ok(BillTotals {
        subtotal,
        tax_amount,
        total,
    })
}

/// Replays the computation for `bill` and checks it against `stored`.
///
/// Returns the (identical) recomputed totals when they agree, otherwise
/// [`CoreError::TotalsMismatch`] naming the first component that drifted.
pub fn verify_stored_totals(bill: &Bill, stored: &BillTotals) -> CoreResult<BillTotals> {
    let computed = bill.totals()?;

    let components = [
        ("subtotal", stored.subtotal, computed.subtotal),
        ("tax_amount", stored.tax_amount, computed.tax_amount),
        ("total", stored.total, computed.total),
    ];
    if let Some((component, stored, computed)) =
        components.into_iter().find(|(_, s, c)| s != c)
    {
        warn!(
            bill_number = %bill.bill_number,
            component,
            stored = %stored,
            computed = %computed,
            "Stored totals disagree with recomputation"
        );
        return Err(CoreError::TotalsMismatch {
            bill_number: bill.bill_number.clone(),
            component,
            stored,
            computed,
        });
    }

    Ok(computed)
}

// =============================================================================
// Totaled Bill
// =============================================================================

/// A bill together with totals known to match [`compute_totals`].
///
/// There is no way to build one with arbitrary totals: either they are
/// computed fresh or a stored copy is verified by replay. This is the input
/// type of the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotaledBill {
    #[serde(flatten)]
    bill: Bill,
    totals: BillTotals,
}

impl TotaledBill {
    /// Computes totals for a bill.
    pub fn compute(bill: Bill) -> CoreResult<Self> {
        let totals = bill.totals()?;
        Ok(TotaledBill { bill, totals })
    }

    /// Accepts a bill with totals loaded from storage, after checking that a
    /// recomputation yields exactly the same values.
    pub fn from_stored(bill: Bill, stored: BillTotals) -> CoreResult<Self> {
        let totals = verify_stored_totals(&bill, &stored)?;
        Ok(TotaledBill { bill, totals })
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn totals(&self) -> &BillTotals {
        &self.totals
    }

    pub fn date(&self) -> NaiveDate {
        self.bill.date
    }

    pub fn into_parts(self) -> (Bill, BillTotals) {
        (self.bill, self.totals)
    }
}

// =============================================================================
// Bill Draft
// =============================================================================

/// Working copy behind the "New Bill" form.
///
/// ## User Workflow
/// ```text
/// Open form ──► BillDraft::new (default GST, one blank line)
///      │
///      ├── add_item / remove_item / set_gst_rate
///      │        │
///      │        ▼
///      │   preview() ──► live subtotal / GST / total
///      │
///      ▼
/// finish() ──► validated TotaledBill (Pending) ──► persistence
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDraft {
    pub bill_number: String,
    pub customer_reference: String,
    pub date: NaiveDate,
    pub gst_rate: TaxRate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    items: Vec<BillItem>,
    max_items: usize,
}

impl BillDraft {
    /// New draft dated `date`, seeded from the configuration.
    pub fn new(config: &BillingConfig, date: NaiveDate) -> Self {
        BillDraft {
            bill_number: String::new(),
            customer_reference: String::new(),
            date,
            gst_rate: config.default_gst_rate,
            payment_method: None,
            notes: None,
            items: vec![BillItem::blank()],
            max_items: config.max_line_items,
        }
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    /// Mutable access to a line for in-place edits.
    pub fn item_mut(&mut self, idx: usize) -> Option<&mut BillItem> {
        self.items.get_mut(idx)
    }

    pub fn add_item(&mut self, item: BillItem) {
        self.items.push(item);
    }

    pub fn add_blank_item(&mut self) {
        self.add_item(BillItem::blank());
    }

    /// Removes a line. Out-of-range indexes are ignored.
    pub fn remove_item(&mut self, idx: usize) -> Option<BillItem> {
        if idx < self.items.len() {
            Some(self.items.remove(idx))
        } else {
            None
        }
    }

    pub fn set_gst_rate(&mut self, rate: TaxRate) {
        self.gst_rate = rate;
    }

    /// Live totals for the form; same function as the saved bill uses.
    pub fn preview(&self) -> CoreResult<BillTotals> {
        compute_totals(&self.items, self.gst_rate)
    }

    /// Validates the whole draft and turns it into a pending bill with its
    /// totals.
    pub fn finish(self) -> CoreResult<TotaledBill> {
        let bill = Bill {
            bill_number: self.bill_number.trim().to_string(),
            date: self.date,
            gst_rate: self.gst_rate,
            items: self.items,
            customer_reference: self.customer_reference.trim().to_string(),
            payment_status: PaymentStatus::Pending,
            payment_method: self.payment_method,
            notes: self.notes,
        };
        validate_bill_with(&bill, self.max_items)?;
        debug!(bill_number = %bill.bill_number, "Finalizing bill draft");
        TotaledBill::compute(bill)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
