//! # Report Module
//!
//! Rolls totaled bills up into calendar-month summaries for the dashboard.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  [TotaledBill]  (any order)                                             │
//! │       │                                                                 │
//! │       ▼  bucket by Period::of(bill.date)        "2024-01", "2024-02"    │
//! │  BTreeMap<Period, MonthlySummary>                                       │
//! │       │  revenue += total, tax += tax_amount, count += 1                │
//! │       ▼                                                                 │
//! │  Vec<MonthlySummary>  ascending by period, only months with bills       │
//! │       │                                                                 │
//! │       ├──► Monthly Revenue chart   (Metric::Revenue)                    │
//! │       ├──► Bills per Month chart   (Metric::Count)                      │
//! │       └──► Tax Collected chart     (Metric::Tax)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Months without bills are not filled in; a chart that wants a continuous
//! axis fills the gaps itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::period::Period;
use crate::totals::TotaledBill;
use crate::types::{Bill, PaymentStatus};

// =============================================================================
// Monthly Summary
// =============================================================================

/// Revenue, bill count and tax collected for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySummary {
    #[ts(type = "string")]
    pub period: Period,
    /// Sum of bill grand totals.
    pub revenue_total: Money,
    pub bill_count: u64,
    /// Sum of bill GST amounts.
    pub tax_total: Money,
}

impl MonthlySummary {
    fn empty(period: Period) -> Self {
        MonthlySummary {
            period,
            revenue_total: Money::zero(),
            bill_count: 0,
            tax_total: Money::zero(),
        }
    }

    /// Value of one metric for this month.
    pub fn metric(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Revenue => MetricValue::Amount(self.revenue_total),
            Metric::Count => MetricValue::Count(self.bill_count),
            Metric::Tax => MetricValue::Amount(self.tax_total),
        }
    }
}

/// Aggregates totaled bills by calendar month, all metrics in one pass.
///
/// Every bill's totals are already in range, but their sum may not be:
/// a month whose revenue or tax leaves i64 minor units fails with
/// [`CoreError::AmountOverflow`] instead of wrapping.
///
/// ## Example
/// ```rust
/// use billbook_core::report::aggregate_by_month;
///
/// assert!(aggregate_by_month(&[]).unwrap().is_empty());
/// ```
pub fn aggregate_by_month(bills: &[TotaledBill]) -> CoreResult<Vec<MonthlySummary>> {
    let mut buckets: BTreeMap<Period, MonthlySummary> = BTreeMap::new();

    for bill in bills {
        let period = Period::of(bill.date());
        let summary = buckets
            .entry(period)
            .or_insert_with(|| MonthlySummary::empty(period));
        let totals = bill.totals();
        summary.revenue_total = accumulate(summary.revenue_total, totals.total, "revenue_total")?;
        summary.tax_total = accumulate(summary.tax_total, totals.tax_amount, "tax_total")?;
        summary.bill_count += 1;
    }

    debug!(
        bills = bills.len(),
        periods = buckets.len(),
        "Aggregated bills by month"
    );

    Ok(buckets.into_values().collect())
}

fn accumulate(acc: Money, amount: Money, field: &str) -> CoreResult<Money> {
    acc.checked_add(amount).ok_or_else(|| {
        warn!(field, "Aggregate left the representable range");
        CoreError::overflow(field)
    })
}

/// Recomputes totals for raw bills, then aggregates them.
///
/// The first bill that fails validation aborts the pass with its
/// `InvalidBillInput`; no partial report is returned.
pub fn aggregate_bills(bills: &[Bill]) -> CoreResult<Vec<MonthlySummary>> {
    let totaled = bills
        .iter()
        .cloned()
        .map(TotaledBill::compute)
        .collect::<CoreResult<Vec<_>>>()?;
    aggregate_by_month(&totaled)
}

// =============================================================================
// Metric Series
// =============================================================================

/// Which summary field a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Count,
    Tax,
}

/// A single metric value: money in minor units, or a plain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum MetricValue {
    Amount(Money),
    Count(u64),
}

/// One point of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct MetricPoint {
    #[ts(type = "string")]
    pub period: Period,
    pub value: MetricValue,
}

/// Month-by-month series of a single metric.
pub fn monthly_series(bills: &[TotaledBill], metric: Metric) -> CoreResult<Vec<MetricPoint>> {
    let points = aggregate_by_month(bills)?
        .into_iter()
        .map(|summary| MetricPoint {
            period: summary.period,
            value: summary.metric(metric),
        })
        .collect();
    Ok(points)
}

// =============================================================================
// Overview
// =============================================================================

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Overview {
    pub bill_count: u64,
    pub revenue_total: Money,
    pub tax_total: Money,
    /// Grand totals of bills marked paid.
    pub paid_total: Money,
    /// Grand totals still outstanding.
    pub pending_total: Money,
}

pub fn overview(bills: &[TotaledBill]) -> CoreResult<Overview> {
    bills.iter().try_fold(Overview::default(), |mut acc, bill| {
        let total = bill.totals().total;
        acc.bill_count += 1;
        acc.revenue_total = accumulate(acc.revenue_total, total, "revenue_total")?;
        acc.tax_total = accumulate(acc.tax_total, bill.totals().tax_amount, "tax_total")?;
        match bill.bill().payment_status {
            PaymentStatus::Paid => {
                acc.paid_total = accumulate(acc.paid_total, total, "paid_total")?
            }
            PaymentStatus::Pending => {
                acc.pending_total = accumulate(acc.pending_total, total, "pending_total")?
            }
        }
        Ok(acc)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
