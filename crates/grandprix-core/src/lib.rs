//! # grandprix-core: Pure Booking Logic for the Grand Prix Ticket Office
//!
//! This crate is the **heart** of the booking system. It contains the ticket
//! catalog, discount rules, order aggregate, payment state machine and the
//! account directory as pure, synchronous code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Grand Prix Booking Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (GUI / console, out of tree)             │   │
//! │  │   Register ──► Browse events ──► Book tickets ──► Pay ──► Admin │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ primitive values in, details out       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ grandprix-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │ ticket  │ │ discount │ │  order  │ │ payment │ │ account │ │   │
//! │  │   │ catalog │ │  engine  │ │aggregate│ │  states │ │directory│ │   │
//! │  │   └─────────┘ └──────────┘ └─────────┘ └─────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • SINGLE-THREADED           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                grandprix-db (Snapshot Store)                    │   │
//! │  │        save/load ordered entity lists per category              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in minor units and basis-point percentages
//! - [`ticket`] - Ticket catalog and the [`Priceable`] capability
//! - [`discount`] - Promotional codes and group discounts
//! - [`payment`] - Payments and their processing state machine
//! - [`order`] - The order aggregate
//! - [`account`] - Users, customers, admins and the directory
//! - [`event`] - Race events with seating capacity
//! - [`booking`] - Facade tying the pieces together
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use grandprix_core::money::Money;
//! use grandprix_core::ticket::{MembershipLevel, Priceable, SeasonMembership, TicketBase};
//!
//! let base = TicketBase::new(
//!     "3001",
//!     Money::from_major_minor(100, 0),
//!     NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
//! )
//! .unwrap();
//!
//! // June through December is seven months at VIP (×1.5)
//! let season = SeasonMembership::new(
//!     base,
//!     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
//!     MembershipLevel::Vip,
//! )
//! .unwrap();
//!
//! assert_eq!(season.calculate_price(), Money::from_major_minor(1050, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod booking;
pub mod discount;
pub mod error;
pub mod event;
pub mod money;
pub mod order;
pub mod payment;
pub mod ticket;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use account::{Admin, Customer, Directory, SalesReport, User};
pub use booking::{BookingOutcome, BookingRequest, BookingSystem, SystemSnapshot};
pub use discount::{Discount, GroupDiscount};
pub use error::{CoreError, CoreResult, ValidationError};
pub use event::{Event, SeatReservation};
pub use money::{Money, Percentage};
pub use order::{Order, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use ticket::{Priceable, Ticket};

use chrono::{Local, NaiveDate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat surcharge per weekend-package day beyond the first (50.00).
pub const EXTRA_DAY_SURCHARGE: Money = Money::from_major_minor(50, 0);

/// Currency code shown next to amounts.
pub const CURRENCY_CODE: &str = "AED";

/// Returns the local calendar date.
///
/// Validity checks that mention "today" call this at evaluation time, so the
/// answer can change between calls. Every such check also has an `_on`
/// variant taking an explicit date.
#[inline]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Generates a fresh identifier for orders and payments.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
