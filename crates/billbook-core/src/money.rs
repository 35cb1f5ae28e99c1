//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing line items as binary floats:                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A live preview and a persisted total computed on different machines   │
//! │  can disagree in the last digit.                                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise / cents)                      │
//! │    ₹12.50 × 200 = 1250 × 200 = 250000 paise, exactly, every time       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billbook_core::money::Money;
//!
//! // Create from minor units (preferred)
//! let rate = Money::from_cents(1250); // 12.50
//!
//! // Or parse exactly from form input
//! let parsed: Money = "12.5".parse().unwrap();
//! assert_eq!(parsed, rate);
//!
//! let line = rate.checked_mul_quantity(200).unwrap();
//! assert_eq!(line.to_string(), "2500.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Number of minor units in one major unit (two decimal places).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative rate typed into a form must be
///   representable so validation can reject it by name
/// - **Single field tuple struct**: serializes as a bare integer
/// - **Checked arithmetic** on the computation path, plain operators for
///   values already known to be in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1200).cents(), 120_000);
    /// ```
    ///
    /// Meant for literal amounts; values near `i64::MAX / 100` overflow.
    /// Use [`Money::checked_from_major`] for amounts read from input.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Like [`Money::from_major`], returning `None` on overflow.
    #[inline]
    pub fn checked_from_major(major: i64) -> Option<Self> {
        major.checked_mul(MINOR_PER_MAJOR).map(Money)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies a unit rate by a quantity, exactly.
    ///
    /// No rounding happens here: a line amount is an exact multiple of the
    /// rate, so summing line amounts never compounds rounding error.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    ///
    /// let rate = Money::from_major(12);
    /// assert_eq!(rate.checked_mul_quantity(200), Some(Money::from_major(2400)));
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Calculates tax on this amount, rounded once to the minor unit using
    /// round-half-up (half away from zero for negative amounts).
    ///
    /// ## Implementation
    /// Integer math in i128: `(|amount| × bps + 5000) / 10000`, sign restored.
    /// The +5000 is half of the 10000 bps divisor, so an exact half rounds up.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    /// use billbook_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(8400);
    /// let tax = subtotal.checked_tax(TaxRate::from_percent(18)).unwrap();
    /// assert_eq!(tax.to_string(), "1512.00");
    ///
    /// // 0.25 at 10% = 0.025 → 0.03 (half rounds up)
    /// let tax = Money::from_cents(25).checked_tax(TaxRate::from_percent(10)).unwrap();
    /// assert_eq!(tax.cents(), 3);
    /// ```
    ///
    /// Returns `None` when the result does not fit in i64 minor units.
    pub fn checked_tax(&self, rate: TaxRate) -> Option<Money> {
        let product = (self.0 as i128) * (rate.bps() as i128);
        let rounded = (product.abs() + 5_000) / 10_000;
        let signed = if product < 0 { -rounded } else { rounded };
        i64::try_from(signed).ok().map(Money)
    }

    /// Formats with a currency symbol prefix: `₹9912.00`, `-₹5.50`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major().abs(),
            self.minor_part()
        )
    }
}

// =============================================================================
// Exact decimal parsing
// =============================================================================

/// Parses a decimal string with at most two fractional digits into an
/// integer scaled by 100 (`"12.5"` → `1250`, `"-3"` → `-300`).
///
/// Shared by [`Money`] and [`TaxRate`] so amounts and percentages typed into
/// a form never pass through a float.
pub(crate) fn parse_scaled_2(input: &str) -> Result<i64, &'static str> {
    let s = input.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err("expected a number");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err("expected a number");
    }
    if frac.len() > 2 {
        return Err("at most two decimal places are allowed");
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| "number is too large")?
    };
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| "expected a number")? * 10,
        _ => frac.parse().map_err(|_| "expected a number")?,
    };

    let scaled = whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or("number is too large")?;

    Ok(if negative { -scaled } else { scaled })
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled_2(s)
            .map(Money)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: reason.to_string(),
            })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering (`9912.00`, `-5.50`).
///
/// Use [`Money::format_with`] to add a currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(""))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_checked_from_major() {
        assert_eq!(Money::checked_from_major(1200), Some(Money::from_major(1200)));
        assert_eq!(Money::checked_from_major(i64::MAX / 100 + 1), None);
        assert_eq!(Money::checked_from_major(i64::MIN), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(991_200).format_with("₹"), "₹9912.00");
        assert_eq!(Money::from_cents(-550).format_with("₹"), "-₹5.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1200".parse::<Money>().unwrap().cents(), 120_000);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("12.05".parse::<Money>().unwrap().cents(), 1205);
        assert_eq!(" .5 ".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-3".parse::<Money>().unwrap().cents(), -300);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!([a, b, b].iter().sum::<Money>().cents(), 2000);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(b), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_cents(1000);
        let tax = amount.checked_tax(TaxRate::from_percent(10)).unwrap();
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = Money::from_cents(1000)
            .checked_tax(TaxRate::from_bps(825))
            .unwrap();
        assert_eq!(tax.cents(), 83);

        // 0.05 at 10% = 0.005 → 0.01 (banker's rounding would give 0.00)
        let tax = Money::from_cents(5)
            .checked_tax(TaxRate::from_percent(10))
            .unwrap();
        assert_eq!(tax.cents(), 1);

        // 0.04 at 10% = 0.004 → 0.00
        let tax = Money::from_cents(4)
            .checked_tax(TaxRate::from_percent(10))
            .unwrap();
        assert_eq!(tax.cents(), 0);
    }

    #[test]
    fn test_tax_on_negative_amount_is_symmetric() {
        let tax = Money::from_cents(-5)
            .checked_tax(TaxRate::from_percent(10))
            .unwrap();
        assert_eq!(tax.cents(), -1);
    }

    #[test]
    fn test_tax_overflow_is_reported() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!(huge.checked_tax(TaxRate::from_percent(200)), None);
    }
}
