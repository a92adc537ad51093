//! # Discount Engine
//!
//! Two kinds of price reduction:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Discount (promotional code)          GroupDiscount                     │
//! │  ─────────────────────────────        ─────────────────────────────     │
//! │  code + percentage                    group size + percentage           │
//! │  valid_from ≤ today ≤ valid_until     no date gating                    │
//! │  is_active flag                       always applies                    │
//! │                                                                         │
//! │  invalid code → price unchanged       price × (1 - p/100)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither type mutates itself when applied. Validity is re-evaluated on every
//! call, so a code that expires at midnight stops applying without anyone
//! touching it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::validation::validate_discount_code;

// =============================================================================
// Promotional Discount
// =============================================================================

/// A date-bounded promotional code.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use grandprix_core::discount::Discount;
/// use grandprix_core::money::Money;
///
/// let eid = Discount::new(
///     "EID2025",
///     20.0,
///     NaiveDate::from_ymd_opt(2025, 3, 28).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
///     true,
/// )
/// .unwrap();
///
/// let during = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
/// let after = NaiveDate::from_ymd_opt(2025, 4, 4).unwrap();
/// let price = Money::from_major_minor(500, 0);
///
/// assert_eq!(eid.apply_discount_on(price, during), Money::from_major_minor(400, 0));
/// assert_eq!(eid.apply_discount_on(price, after), price);
/// ```
///
/// Codes are stored trimmed: `" EID2025 "` becomes `"EID2025"`. Stored
/// records are normalized the same way when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord")]
pub struct Discount {
    pub code: String,
    pub percentage: Percentage,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
}

impl Discount {
    /// Creates a discount code.
    ///
    /// ## Errors
    /// - `InvalidFormat`/`Required` for a malformed code
    /// - `OutOfRange` when `percentage` is outside 0 to 100
    pub fn new(
        code: impl Into<String>,
        percentage: f64,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        is_active: bool,
    ) -> Result<Self, ValidationError> {
        let percentage = Percentage::from_percent(percentage)?;
        Self::with_rate(code.into(), percentage, valid_from, valid_until, is_active)
    }

    fn with_rate(
        code: String,
        percentage: Percentage,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        is_active: bool,
    ) -> Result<Self, ValidationError> {
        validate_discount_code(&code)?;
        Ok(Self {
            code: code.trim().to_string(),
            percentage,
            valid_from,
            valid_until,
            is_active,
        })
    }

    /// Changes the rate. The old rate is kept on error.
    pub fn set_percentage(&mut self, percentage: f64) -> Result<(), ValidationError> {
        self.percentage = Percentage::from_percent(percentage)?;
        Ok(())
    }

    /// Active and `today` falls inside the window, both ends inclusive.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.valid_from <= today && today <= self.valid_until
    }

    /// [`Discount::is_valid_on`] against the local date at call time.
    pub fn is_valid(&self) -> bool {
        self.is_valid_on(crate::today())
    }

    /// Reduced price if the code is valid on `today`, otherwise `price`.
    pub fn apply_discount_on(&self, price: Money, today: NaiveDate) -> Money {
        if self.is_valid_on(today) {
            price.apply_percentage_discount(self.percentage)
        } else {
            price
        }
    }

    /// [`Discount::apply_discount_on`] against the local date at call time.
    pub fn apply_discount(&self, price: Money) -> Money {
        self.apply_discount_on(price, crate::today())
    }
}

#[derive(Deserialize)]
struct DiscountRecord {
    code: String,
    percentage: Percentage,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    is_active: bool,
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = ValidationError;

    fn try_from(record: DiscountRecord) -> Result<Self, Self::Error> {
        Discount::with_rate(
            record.code,
            record.percentage,
            record.valid_from,
            record.valid_until,
            record.is_active,
        )
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} off, valid from {} to {}, active: {})",
            self.code, self.percentage, self.valid_from, self.valid_until, self.is_active
        )
    }
}

// =============================================================================
// Group Discount
// =============================================================================

/// A flat reduction for parties of a minimum size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDiscount {
    pub group_size: u32,
    pub percentage: Percentage,
}

impl GroupDiscount {
    pub fn new(group_size: u32, percentage: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            group_size,
            percentage: Percentage::from_percent(percentage)?,
        })
    }

    /// Changes the rate. The old rate is kept on error.
    pub fn set_percentage(&mut self, percentage: f64) -> Result<(), ValidationError> {
        self.percentage = Percentage::from_percent(percentage)?;
        Ok(())
    }

    /// Discounted price. No date check, never fails.
    pub fn calculate_discount(&self, base_price: Money) -> Money {
        base_price.apply_percentage_discount(self.percentage)
    }

    /// Whether a party of `party_size` people is large enough.
    pub fn qualifies(&self, party_size: u32) -> bool {
        party_size >= self.group_size
    }
}

impl fmt::Display for GroupDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group size: {}, Discount: {}", self.group_size, self.percentage)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
