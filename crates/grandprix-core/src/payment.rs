//! # Payments
//!
//! A payment record and its processing state machine.
//!
//! ## Status Flow
//! ```text
//!                 process()                    refund()
//!   ┌─────────┐  ─────────────►  ┌───────────┐ ─────────► ┌──────────┐
//!   │ Pending │                  │ Processed │            │ Refunded │
//!   └─────────┘  ──────┐         └───────────┘            └──────────┘
//!                      │ card checks fail
//!                      ▼
//!                 ┌────────┐
//!                 │ Failed │  (terminal)
//!                 └────────┘
//! ```
//!
//! Every payment starts `Pending`, whatever its method. A declined card is a
//! status, not an error. Only a refund from the wrong state returns an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_card_number, validate_cvv, validate_non_negative};

// =============================================================================
// Payment Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processed,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Processed => "Processed",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Refunded => "Refunded",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Settled at the counter. Always succeeds.
    Direct,
    /// Card payment, checked at processing time.
    CreditCard {
        card_number: String,
        cardholder_name: String,
        expiry_date: NaiveDate,
        cvv: String,
    },
    /// Third-party wallet. Always succeeds.
    DigitalWallet { wallet_id: String, provider: String },
}

impl PaymentMethod {
    /// Card checks: 16-digit number, 3-digit CVV, expiry strictly after `today`.
    ///
    /// Methods without a card always pass.
    pub fn validate_on(&self, today: NaiveDate) -> bool {
        match self {
            PaymentMethod::CreditCard {
                card_number,
                expiry_date,
                cvv,
                ..
            } => {
                validate_card_number(card_number).is_ok()
                    && validate_cvv(cvv).is_ok()
                    && *expiry_date > today
            }
            PaymentMethod::Direct | PaymentMethod::DigitalWallet { .. } => true,
        }
    }

    fn details(&self) -> MethodDetails {
        match self {
            PaymentMethod::Direct => MethodDetails::Direct,
            PaymentMethod::CreditCard {
                card_number,
                cardholder_name,
                expiry_date,
                ..
            } => MethodDetails::CreditCard {
                masked_number: mask_card_number(card_number),
                cardholder_name: cardholder_name.clone(),
                expiry_date: *expiry_date,
            },
            PaymentMethod::DigitalWallet {
                wallet_id,
                provider,
            } => MethodDetails::DigitalWallet {
                wallet_id: wallet_id.clone(),
                provider: provider.clone(),
            },
        }
    }
}

/// Keeps the last four characters, stars the rest.
fn mask_card_number(number: &str) -> String {
    let count = number.chars().count();
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < count { '*' } else { c })
        .collect()
}

// =============================================================================
// Payment
// =============================================================================

/// A payment attached to an order.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use grandprix_core::money::Money;
/// use grandprix_core::payment::{Payment, PaymentMethod, PaymentStatus};
///
/// let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
/// let mut payment = Payment::new(
///     "P-1",
///     Money::from_major_minor(750, 0),
///     today,
///     PaymentMethod::CreditCard {
///         card_number: "1234567812345678".into(),
///         cardholder_name: "Salama Alneyadi".into(),
///         expiry_date: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
///         cvv: "123".into(),
///     },
/// )
/// .unwrap();
///
/// assert_eq!(payment.process_on(today), PaymentStatus::Processed);
/// assert!(payment.refund().is_ok());
/// assert_eq!(payment.status(), PaymentStatus::Refunded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaymentRecord")]
pub struct Payment {
    id: String,
    amount: Money,
    date: NaiveDate,
    status: PaymentStatus,
    pub method: PaymentMethod,
}

/// Unchecked shape of a stored payment.
#[derive(Deserialize)]
struct PaymentRecord {
    id: String,
    amount: Money,
    date: NaiveDate,
    status: PaymentStatus,
    method: PaymentMethod,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = ValidationError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        let mut payment = Payment::new(record.id, record.amount, record.date, record.method)?;
        payment.status = record.status;
        Ok(payment)
    }
}

impl Payment {
    /// Creates a `Pending` payment. Fails on a negative amount.
    pub fn new(
        id: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        method: PaymentMethod,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("amount", amount)?;
        Ok(Self {
            id: id.into(),
            amount,
            date,
            status: PaymentStatus::Pending,
            method,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Replaces the amount. The old amount is kept on error.
    pub fn set_amount(&mut self, amount: Money) -> Result<(), ValidationError> {
        validate_non_negative("amount", amount)?;
        self.amount = amount;
        Ok(())
    }

    /// Processes a pending payment and returns the resulting status.
    ///
    /// A payment that already left `Pending` is not processed again; its
    /// current status is returned as is.
    pub fn process_on(&mut self, today: NaiveDate) -> PaymentStatus {
        if self.status != PaymentStatus::Pending {
            debug!(payment_id = %self.id, status = %self.status, "Payment already settled");
            return self.status;
        }

        if self.method.validate_on(today) {
            self.status = PaymentStatus::Processed;
            info!(payment_id = %self.id, amount = %self.amount, "Payment processed");
        } else {
            self.status = PaymentStatus::Failed;
            warn!(payment_id = %self.id, "Card validation failed");
        }
        self.status
    }

    /// [`Payment::process_on`] against the local date.
    pub fn process(&mut self) -> PaymentStatus {
        self.process_on(crate::today())
    }

    /// Refunds a processed payment.
    ///
    /// ## Errors
    /// `RefundNotAllowed` from any status other than `Processed`.
    pub fn refund(&mut self) -> CoreResult<()> {
        if self.status != PaymentStatus::Processed {
            return Err(CoreError::RefundNotAllowed {
                payment_id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        self.status = PaymentStatus::Refunded;
        info!(payment_id = %self.id, "Payment refunded");
        Ok(())
    }

    /// Snapshot safe to show: card number masked, CVV left out.
    pub fn details(&self) -> PaymentDetails {
        PaymentDetails {
            id: self.id.clone(),
            amount: self.amount,
            date: self.date,
            status: self.status,
            method: self.method.details(),
        }
    }
}

// =============================================================================
// Details Snapshots
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentDetails {
    pub id: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: PaymentStatus,
    pub method: MethodDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum MethodDetails {
    Direct,
    CreditCard {
        masked_number: String,
        cardholder_name: String,
        #[ts(as = "String")]
        expiry_date: NaiveDate,
    },
    DigitalWallet {
        wallet_id: String,
        provider: String,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================
