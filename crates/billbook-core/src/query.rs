//! # Bill Queries
//!
//! Filtering used by the bill list and customer detail views.
//!
//! Customer names live with the persistence layer, so searches take a
//! resolver closure instead of a customer table.

use tracing::debug;

use crate::totals::TotaledBill;
use crate::types::Bill;

impl AsRef<Bill> for Bill {
    fn as_ref(&self) -> &Bill {
        self
    }
}

impl AsRef<Bill> for TotaledBill {
    fn as_ref(&self) -> &Bill {
        self.bill()
    }
}

/// Case-insensitive substring search on bill number or customer name.
///
/// An empty (or blank) needle matches everything, in input order.
///
/// ## Example
/// ```rust
/// use billbook_core::query::search_bills;
/// # use billbook_core::{Bill, BillItem, Money, TaxRate, PaymentStatus};
/// # use chrono::NaiveDate;
/// # let bill = Bill {
/// #     bill_number: "INV-1001".into(),
/// #     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
/// #     gst_rate: TaxRate::from_percent(18),
/// #     items: vec![BillItem::new("Steel Rods", Money::from_major(1200), 5)],
/// #     customer_reference: "c_1".into(),
/// #     payment_status: PaymentStatus::Paid,
/// #     payment_method: None,
/// #     notes: None,
/// # };
/// let bills = vec![bill];
/// let hits = search_bills(&bills, "acme", |id| (id == "c_1").then_some("Acme Retailers"));
/// assert_eq!(hits.len(), 1);
/// ```
pub fn search_bills<'a, B, F, N>(bills: &'a [B], needle: &str, customer_name: F) -> Vec<&'a B>
where
    B: AsRef<Bill>,
    F: Fn(&str) -> Option<N>,
    N: AsRef<str>,
{
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return bills.iter().collect();
    }

    let hits: Vec<&B> = bills
        .iter()
        .filter(|b| {
            let bill = b.as_ref();
            bill.bill_number.to_lowercase().contains(&needle)
                || customer_name(&bill.customer_reference)
                    .map(|name| name.as_ref().to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect();

    debug!(needle = %needle, matched = hits.len(), total = bills.len(), "Searched bills");
    hits
}

/// Bills belonging to one customer, in input order.
pub fn bills_for_customer<'a, B>(bills: &'a [B], customer_reference: &str) -> Vec<&'a B>
where
    B: AsRef<Bill>,
{
    bills
        .iter()
        .filter(|b| b.as_ref().customer_reference == customer_reference)
        .collect()
}
