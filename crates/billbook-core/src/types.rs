//! # Domain Types
//!
//! Core domain types shared by the computation and aggregation engines.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Bill       │   │    BillItem     │   │   BillTotals    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bill_number    │◄──│  description    │   │  subtotal       │       │
//! │  │  date           │ 1..│  rate (Money)   │   │  tax_amount     │       │
//! │  │  gst_rate       │   │  quantity       │   │  total          │       │
//! │  │  items          │   └─────────────────┘   └─────────────────┘       │
//! │  │  customer_ref   │                          (derived, never typed)   │
//! │  │  payment_status │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │    TaxRate      │   │ PaymentStatus   │       │
//! │                        │  bps (i32)      │   │  Paid           │       │
//! │                        │  1800 = 18%     │   │  Pending        │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are owned by their bill. Bills are owned by the persistence layer
//! and only borrowed here.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{parse_scaled_2, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18%, 250 bps = 2.5%
///
/// Signed, so a negative rate entered on a form can be held long enough to
/// be rejected with a field-level error.
///
/// On the wire a rate is a percentage, as stored bill records and config
/// files write it: `18` is 18%, `2.5` is 2.5%. Basis points never leave the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct TaxRate(i32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage (`18` → 18%).
    ///
    /// Meant for literal rates; `pct` beyond ±21474836 overflows. Use
    /// [`TaxRate::checked_from_percent`] for values read from input.
    #[inline]
    pub const fn from_percent(pct: i32) -> Self {
        TaxRate(pct * 100)
    }

    /// Like [`TaxRate::from_percent`], returning `None` when the rate does not
    /// fit in basis points.
    pub fn checked_from_percent(pct: i64) -> Option<Self> {
        pct.checked_mul(100)
            .and_then(|bps| i32::try_from(bps).ok())
            .map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Renders as a percentage without trailing zeros: `18%`, `2.5%`, `8.25%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / 100;
        let frac = abs % 100;
        match frac {
            0 => write!(f, "{}{}%", sign, whole),
            f10 if f10 % 10 == 0 => write!(f, "{}{}.{}%", sign, whole, f10 / 10),
            _ => write!(f, "{}{}.{:02}%", sign, whole, frac),
        }
    }
}

/// Parses a percentage as typed on the bill form (`"18"`, `"2.5"`, `"18%"`).
impl FromStr for TaxRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "gst_rate".to_string(),
            reason: reason.to_string(),
        };
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
        let bps = parse_scaled_2(trimmed).map_err(invalid)?;
        i32::try_from(bps)
            .map(TaxRate)
            .map_err(|_| invalid("rate is too large"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentRepr {
    Whole(i64),
    Fraction(f64),
    Text(String),
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(i64::from(self.0 / 100))
        } else {
            serializer.serialize_f64(f64::from(self.0) / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PercentRepr::deserialize(deserializer)? {
            PercentRepr::Whole(pct) => TaxRate::checked_from_percent(pct)
                .ok_or_else(|| serde::de::Error::custom("rate is too large")),
            // Shortest round-trip text of the float, so 2.5 parses as "2.5"
            // and 8.125 is rejected for its third decimal.
            PercentRepr::Fraction(pct) => pct.to_string().parse().map_err(serde::de::Error::custom),
            PercentRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether the customer has settled the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
#[ts(export)]
pub enum PaymentStatus {
    Paid,
    /// New bills start out pending.
    #[default]
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::Pending => write!(f, "Pending"),
        }
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line on a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillItem {
    pub description: String,
    /// Unit rate in minor units.
    pub rate: Money,
    pub quantity: i64,
}

impl BillItem {
    pub fn new(description: impl Into<String>, rate: Money, quantity: i64) -> Self {
        BillItem {
            description: description.into(),
            rate,
            quantity,
        }
    }

    /// Blank line as added by the bill form ("Add item").
    pub fn blank() -> Self {
        BillItem::new("", Money::zero(), 1)
    }

    /// Line amount (`rate × quantity`), exact. `None` on overflow.
    pub fn amount(&self) -> Option<Money> {
        self.rate.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Derived totals of a bill.
///
/// Only ever produced by [`crate::totals::compute_totals`]; a stored copy is a
/// cache that must equal a replay of that function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

// =============================================================================
// Bill
// =============================================================================

/// A dated, itemized bill owed by one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    /// Human-facing identifier (`INV-1001`); uniqueness is enforced by the
    /// persistence layer.
    pub bill_number: String,

    /// Calendar date of the bill. Only year and month matter for reporting.
    ///
    /// Written as `YYYY-MM-DD`; stored RFC 3339 timestamps are also read,
    /// keeping the date as written.
    #[ts(as = "String")]
    #[serde(deserialize_with = "crate::period::deserialize_bill_date")]
    pub date: NaiveDate,

    /// GST rate applied to the subtotal.
    pub gst_rate: TaxRate,

    /// Line items in display order. Must not be empty.
    pub items: Vec<BillItem>,

    /// Customer this bill belongs to. Existence is not checked here.
    pub customer_reference: String,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    /// Free text such as "UPI", "Card", "Bank Transfer".
    #[serde(default)]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Bill {
    /// Computes this bill's totals through the single totals function.
    pub fn totals(&self) -> CoreResult<BillTotals> {
        crate::totals::compute_totals(&self.items, self.gst_rate)
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
