//! # Money Module
//!
//! Provides the `Money` type for ticket prices and the `Percentage` type for
//! discount rates and price multipliers.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    100.0 * 1.1 = 110.00000000000001                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                       │
//! │    10000 fils × 11000 bps / 10000 = 11000 fils (110.00 AED)             │
//! │    Every multiplier rounds once, half away from zero, to a whole fil    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grandprix_core::money::{Money, Percentage};
//!
//! let price = Money::from_major_minor(200, 0); // 200.00
//! let vip = price.scale_bps(12_000);            // ×1.2
//! assert_eq!(vip.cents(), 24_000);
//!
//! let off = Percentage::from_percent(15.0).unwrap();
//! assert_eq!(Money::from_cents(25_000).apply_percentage_discount(off).cents(), 21_250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

/// Basis points that make up a whole (100%, or ×1.0 as a multiplier).
pub const BPS_SCALE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (fils for AED).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between totals may be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - Serializes as a bare integer, which keeps stored records compact
///
/// ## Where Money Flows
/// ```text
/// Ticket.base_price ──► calculate_price() ──► Order.total ──► Payment.amount
///                                                  │
///                                                  ▼
///                                     Admin sales report (sum of payments)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use grandprix_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a factor expressed in basis points.
    ///
    /// `10_000` is ×1.0, `12_000` is ×1.2, `15_000` is ×1.5. The product is
    /// rounded half away from zero to a whole minor unit, the integer
    /// equivalent of rounding to two decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use grandprix_core::money::Money;
    ///
    /// let base = Money::from_major_minor(100, 0);
    /// assert_eq!(base.scale_bps(11_000), Money::from_major_minor(110, 0));
    /// assert_eq!(Money::from_cents(5).scale_bps(15_000).cents(), 8); // 7.5 → 8
    /// ```
    pub fn scale_bps(&self, factor_bps: u32) -> Money {
        // i128 so large season totals cannot overflow mid-calculation
        let product = self.0 as i128 * factor_bps as i128;
        let half = (BPS_SCALE / 2) as i128;
        let scaled = if product >= 0 {
            (product + half) / BPS_SCALE as i128
        } else {
            (product - half) / BPS_SCALE as i128
        };
        Money(scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a whole count (months, days, seats).
    ///
    /// Saturates at the `i64` bounds instead of wrapping.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// The discount portion is rounded to the nearest minor unit before it is
    /// subtracted, so `price - discount` always adds back up to `price`.
    ///
    /// ## Example
    /// ```rust
    /// use grandprix_core::money::{Money, Percentage};
    ///
    /// let subtotal = Money::from_major_minor(100, 0);
    /// let ten = Percentage::from_percent(10.0).unwrap();
    /// assert_eq!(subtotal.apply_percentage_discount(ten).cents(), 9000);
    /// ```
    pub fn apply_percentage_discount(&self, discount: Percentage) -> Money {
        let discount_amount = self.scale_bps(discount.bps());
        *self - discount_amount
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the currency code, e.g. `AED 1050.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{} {}{}.{:02}",
            crate::CURRENCY_CODE,
            sign,
            self.major().abs(),
            self.minor()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing an iterator of prices (order totals, sales reports).
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
// Percentage
// =============================================================================

/// A validated percentage in basis points (0 = 0%, 10000 = 100%).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. Discount codes like "12.5% off" stay exact, and
/// the value can be applied to [`Money`] without floating point.
///
/// ## Invariant
/// The inner value never exceeds [`BPS_SCALE`]. Every constructor checks it,
/// including deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u32", into = "u32")]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// 0%.
    pub const ZERO: Percentage = Percentage(0);

    /// Creates a percentage from basis points.
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps > BPS_SCALE {
            return Err(ValidationError::OutOfRange {
                field: "percentage".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Percentage(bps))
    }

    /// Creates a percentage from a value between 0 and 100.
    ///
    /// ## Example
    /// ```rust
    /// use grandprix_core::money::Percentage;
    ///
    /// assert_eq!(Percentage::from_percent(12.5).unwrap().bps(), 1250);
    /// assert!(Percentage::from_percent(100.5).is_err());
    /// assert!(Percentage::from_percent(-1.0).is_err());
    /// ```
    pub fn from_percent(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(ValidationError::OutOfRange {
                field: "percentage".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Percentage((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::ZERO
    }
}

impl TryFrom<u32> for Percentage {
    type Error = ValidationError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Percentage::from_bps(bps)
    }
}

impl From<Percentage> for u32 {
    fn from(pct: Percentage) -> Self {
        pct.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
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
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(105_000).to_string(), "AED 1050.00");
        assert_eq!(Money::from_cents(500).to_string(), "AED 5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "AED -5.50");
        assert_eq!(Money::zero().to_string(), "AED 0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(10_000);
        let b = Money::from_cents(15_000);

        assert_eq!((a + b).cents(), 25_000);
        assert_eq!((b - a).cents(), 5_000);
        assert_eq!((a * 3).cents(), 30_000);

        let total: Money = [a, b].iter().sum();
        assert_eq!(total, Money::from_major_minor(250, 0));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX / 4);

        assert_eq!(huge.multiply_quantity(12).cents(), i64::MAX);
        assert_eq!((huge * 12).scale_bps(15_000).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MAX) + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!(Money::from_cents(i64::MIN).multiply_quantity(2).cents(), i64::MIN);
    }

    #[test]
    fn test_scale_bps_rounds_half_away_from_zero() {
        assert_eq!(Money::from_cents(5).scale_bps(15_000).cents(), 8);
        assert_eq!(Money::from_cents(-5).scale_bps(15_000).cents(), -8);
        assert_eq!(Money::from_cents(101).scale_bps(11_000).cents(), 111);
        assert_eq!(Money::from_cents(999).scale_bps(BPS_SCALE).cents(), 999);
    }

    #[test]
    fn test_percentage_discount() {
        let subtotal = Money::from_major_minor(250, 0);
        let fifteen = Percentage::from_percent(15.0).unwrap();
        assert_eq!(subtotal.apply_percentage_discount(fifteen).cents(), 21_250);

        let none = Percentage::ZERO;
        assert_eq!(subtotal.apply_percentage_discount(none), subtotal);

        let all = Percentage::from_percent(100.0).unwrap();
        assert!(subtotal.apply_percentage_discount(all).is_zero());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(Percentage::from_bps(10_000).is_ok());
        assert!(Percentage::from_bps(10_001).is_err());
        assert!(Percentage::from_percent(f64::NAN).is_err());
        assert_eq!(Percentage::from_percent(7.5).unwrap().to_string(), "7.50%");
    }

    #[test]
    fn test_percentage_rejects_out_of_range_on_deserialize() {
        let ok: Percentage = serde_json::from_str("1500").unwrap();
        assert_eq!(ok.bps(), 1500);
        assert!(serde_json::from_str::<Percentage>("20000").is_err());
    }
}
