//! # Order Aggregate
//!
//! An order bundles a customer reference, a set of tickets, one payment and a
//! status. The order owns its payment; the customer is referenced by id.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_ticket / remove_ticket                                             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  total = Σ ticket.calculate_price()   (discount code cleared)           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  apply_discount(code)  ──► total = code applied to Σ prices             │
//! │        │                   (never to an already discounted total)       │
//! │        ▼                                                                │
//! │  payment.amount = total   after every change                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status
//! [`Order::update_status`] overwrites the status unconditionally.
//! [`Order::transition_to`] enforces the lifecycle:
//!
//! ```text
//! Pending ──► Confirmed
//!    │──────► Paid
//!    └──────► Cancelled          (all three are terminal)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::discount::Discount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percentage};
use crate::payment::{Payment, PaymentDetails, PaymentStatus};
use crate::ticket::{Priceable, Ticket};

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::Pending,
                OrderStatus::Confirmed | OrderStatus::Paid | OrderStatus::Cancelled
            )
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "order status".to_string(),
                allowed: vec![
                    "pending".to_string(),
                    "confirmed".to_string(),
                    "paid".to_string(),
                    "cancelled".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    customer_id: String,
    tickets: Vec<Ticket>,
    payment: Payment,
    status: OrderStatus,
    total: Money,
    order_date: NaiveDate,
    applied_discount: Option<String>,
    #[serde(default)]
    standing_discount: Option<Percentage>,
}

impl Order {
    /// Creates an empty `Pending` order. The payment amount is reset to zero
    /// so it matches the empty ticket list.
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        order_date: NaiveDate,
        payment: Payment,
    ) -> Self {
        let mut order = Self {
            id: id.into(),
            customer_id: customer_id.into(),
            tickets: Vec::new(),
            payment,
            status: OrderStatus::Pending,
            total: Money::zero(),
            order_date,
            applied_discount: None,
            standing_discount: None,
        };
        order.sync_payment();
        order
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    /// Code of the discount currently reflected in the total, if any.
    pub fn applied_discount(&self) -> Option<&str> {
        self.applied_discount.as_deref()
    }

    /// Customer rate already taken off the total, if any.
    pub fn standing_discount(&self) -> Option<Percentage> {
        self.standing_discount
    }

    /// Sum of ticket prices before any discount.
    pub fn subtotal(&self) -> Money {
        self.tickets.iter().map(|t| t.calculate_price()).sum()
    }

    // -------------------------------------------------------------------------
    // Tickets
    // -------------------------------------------------------------------------

    /// Adds a ticket unless one with the same id is already in the order.
    ///
    /// Returns `true` if the ticket was added.
    pub fn add_ticket(&mut self, ticket: impl Into<Ticket>) -> bool {
        let ticket = ticket.into();
        if self.tickets.iter().any(|t| t.id() == ticket.id()) {
            debug!(order_id = %self.id, ticket_id = %ticket.id(), "Ticket already in order");
            return false;
        }
        self.tickets.push(ticket);
        self.recompute();
        true
    }

    /// Removes the ticket with `ticket_id`. Returns `false` if it was absent.
    pub fn remove_ticket(&mut self, ticket_id: &str) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id() != ticket_id);
        if self.tickets.len() == before {
            return false;
        }
        self.recompute();
        true
    }

    /// Total back to the plain ticket sum; any applied discount is dropped.
    fn recompute(&mut self) {
        self.total = self.subtotal();
        self.applied_discount = None;
        self.standing_discount = None;
        self.sync_payment();
    }

    fn sync_payment(&mut self) {
        if let Err(err) = self.payment.set_amount(self.total) {
            warn!(order_id = %self.id, error = %err, "Order total not copied to payment");
        }
    }

    // -------------------------------------------------------------------------
    // Discounts
    // -------------------------------------------------------------------------

    /// Applies a discount code if it is valid on `today`.
    ///
    /// The reduction is taken from the ticket sum, so applying a second code
    /// replaces the first instead of stacking. Returns `true` if applied.
    pub fn apply_discount_on(&mut self, discount: &Discount, today: NaiveDate) -> bool {
        if !discount.is_valid_on(today) {
            debug!(order_id = %self.id, code = %discount.code, "Discount not valid");
            return false;
        }
        let discounted = discount.apply_discount_on(self.subtotal(), today);
        self.total = match self.standing_discount {
            Some(rate) => discounted.apply_percentage_discount(rate),
            None => discounted,
        };
        self.applied_discount = Some(discount.code.clone());
        self.sync_payment();
        true
    }

    /// [`Order::apply_discount_on`] against the local date.
    pub fn apply_discount(&mut self, discount: &Discount) -> bool {
        self.apply_discount_on(discount, crate::today())
    }

    /// Takes a customer's standing discount off the current total.
    ///
    /// Applies once. Later calls keep the rate already taken off, so the
    /// total a payment was processed for is not reduced again.
    pub(crate) fn apply_percentage(&mut self, rate: Percentage) {
        if self.standing_discount.is_some() {
            return;
        }
        self.standing_discount = Some(rate);
        if rate.is_zero() {
            return;
        }
        self.total = self.total.apply_percentage_discount(rate);
        self.sync_payment();
    }

    // -------------------------------------------------------------------------
    // Status & Payment
    // -------------------------------------------------------------------------

    /// Overwrites the status with no lifecycle check.
    pub fn update_status(&mut self, status: OrderStatus) -> OrderStatus {
        self.status = status;
        self.status
    }

    /// Moves to `next` if the lifecycle allows it.
    ///
    /// ## Errors
    /// `InvalidOrderTransition` for anything but Pending → Confirmed, Paid or
    /// Cancelled. The status is unchanged on error.
    pub fn transition_to(&mut self, next: OrderStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidOrderTransition {
                order_id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Processes the owned payment. The total is never touched.
    pub fn process_payment_on(&mut self, today: NaiveDate) -> PaymentStatus {
        self.payment.process_on(today)
    }

    /// [`Order::process_payment_on`] against the local date.
    pub fn process_payment(&mut self) -> PaymentStatus {
        self.process_payment_on(crate::today())
    }

    /// Refunds the owned payment.
    pub fn refund_payment(&mut self) -> CoreResult<()> {
        self.payment.refund()
    }

    pub fn details(&self) -> OrderDetails {
        OrderDetails {
            id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            ticket_ids: self.tickets.iter().map(|t| t.id().to_string()).collect(),
            total: self.total,
            order_date: self.order_date,
            status: self.status,
            applied_discount: self.applied_discount.clone(),
            payment: self.payment.details(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order[{}] for customer {}, Status: {}, Total: {}",
            self.id, self.customer_id, self.status, self.total
        )
    }
}

/// Order snapshot for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetails {
    pub id: String,
    pub customer_id: String,
    pub ticket_ids: Vec<String>,
    pub total: Money,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    pub status: OrderStatus,
    pub applied_discount: Option<String>,
    pub payment: PaymentDetails,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentMethod;
    use crate::ticket::TicketBase;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ticket(id: &str, major: i64) -> TicketBase {
        TicketBase::new(id, Money::from_major_minor(major, 0), date(2025, 12, 1)).unwrap()
    }

    fn order() -> Order {
        let payment = Payment::new("101", Money::zero(), date(2025, 5, 10), PaymentMethod::Direct).unwrap();
        Order::new("5001", "C-1", date(2025, 5, 10), payment)
    }

    fn code(pct: f64) -> Discount {
        Discount::new("EID2025", pct, date(2025, 1, 1), date(2025, 12, 31), true).unwrap()
    }

    #[test]
    fn test_new_order_syncs_payment_to_zero() {
        let payment = Payment::new("101", Money::from_major_minor(99, 0), date(2025, 5, 10), PaymentMethod::Direct)
            .unwrap();
        let order = Order::new("5001", "C-1", date(2025, 5, 10), payment);
        assert!(order.total().is_zero());
        assert!(order.payment().amount().is_zero());
    }

    #[test]
    fn test_add_tickets_sums_prices() {
        let mut o = order();
        assert!(o.add_ticket(ticket("201", 100)));
        assert!(o.add_ticket(ticket("202", 150)));
        assert_eq!(o.total(), Money::from_major_minor(250, 0));
        assert_eq!(o.payment().amount(), o.total());
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut o = order();
        o.add_ticket(ticket("201", 100));
        assert!(!o.add_ticket(ticket("201", 500)));
        assert_eq!(o.ticket_count(), 1);
        assert_eq!(o.total(), Money::from_major_minor(100, 0));
    }

    #[test]
    fn test_remove_ticket() {
        let mut o = order();
        o.add_ticket(ticket("301", 120));
        o.add_ticket(ticket("302", 80));

        assert!(!o.remove_ticket("999"));
        assert_eq!(o.total(), Money::from_major_minor(200, 0));

        assert!(o.remove_ticket("301"));
        assert_eq!(o.total(), Money::from_major_minor(80, 0));
        assert_eq!(o.payment().amount(), Money::from_major_minor(80, 0));
    }

    #[test]
    fn test_discounts_do_not_stack() {
        let mut o = order();
        o.add_ticket(ticket("201", 100));
        o.add_ticket(ticket("202", 150));

        let today = date(2025, 6, 1);
        assert!(o.apply_discount_on(&code(10.0), today));
        assert!(o.apply_discount_on(&code(10.0), today));
        assert_eq!(o.total(), Money::from_major_minor(225, 0));
        assert_eq!(o.applied_discount(), Some("EID2025"));
        assert_eq!(o.payment().amount(), Money::from_major_minor(225, 0));
    }

    #[test]
    fn test_standing_discount_applies_once() {
        let mut o = order();
        o.add_ticket(ticket("201", 200));

        let ten = Percentage::from_percent(10.0).unwrap();
        o.apply_percentage(ten);
        o.apply_percentage(Percentage::from_percent(50.0).unwrap());
        assert_eq!(o.total(), Money::from_major_minor(180, 0));
        assert_eq!(o.standing_discount(), Some(ten));

        assert!(o.apply_discount_on(&code(10.0), date(2025, 6, 1)));
        assert_eq!(o.total(), Money::from_major_minor(162, 0));
        assert_eq!(o.payment().amount(), o.total());

        o.add_ticket(ticket("202", 100));
        assert_eq!(o.standing_discount(), None);
        assert_eq!(o.total(), Money::from_major_minor(300, 0));
    }

    #[test]
    fn test_invalid_discount_leaves_total() {
        let mut o = order();
        o.add_ticket(ticket("201", 100));
        assert!(!o.apply_discount_on(&code(10.0), date(2026, 1, 1)));
        assert_eq!(o.total(), Money::from_major_minor(100, 0));
        assert_eq!(o.applied_discount(), None);
    }

    #[test]
    fn test_ticket_change_clears_discount() {
        let mut o = order();
        o.add_ticket(ticket("201", 100));
        o.apply_discount_on(&code(50.0), date(2025, 6, 1));
        assert_eq!(o.total(), Money::from_major_minor(50, 0));

        o.add_ticket(ticket("202", 100));
        assert_eq!(o.total(), Money::from_major_minor(200, 0));
        assert_eq!(o.applied_discount(), None);
    }

    #[test]
    fn test_update_status_is_unconditional() {
        let mut o = order();
        o.update_status(OrderStatus::Paid);
        assert_eq!(o.update_status(OrderStatus::Pending), OrderStatus::Pending);
    }

    #[test]
    fn test_transition_rules() {
        let mut o = order();
        o.transition_to(OrderStatus::Confirmed).unwrap();

        let err = o.transition_to(OrderStatus::Paid).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrderTransition { .. }));
        assert_eq!(o.status(), OrderStatus::Confirmed);

        let mut o = order();
        assert!(o.transition_to(OrderStatus::Pending).is_err());
        o.transition_to(OrderStatus::Cancelled).unwrap();
        assert!(o.transition_to(OrderStatus::Paid).is_err());
    }

    #[test]
    fn test_failed_card_leaves_total() {
        let payment = Payment::new(
            "102",
            Money::zero(),
            date(2025, 5, 10),
            PaymentMethod::CreditCard {
                card_number: "123".to_string(),
                cardholder_name: "Ghazlan Alketbi".to_string(),
                expiry_date: date(2027, 1, 1),
                cvv: "123".to_string(),
            },
        )
        .unwrap();
        let mut o = Order::new("5002", "C-2", date(2025, 5, 10), payment);
        o.add_ticket(ticket("301", 120));

        assert_eq!(o.process_payment_on(date(2025, 5, 10)), PaymentStatus::Failed);
        assert_eq!(o.total(), Money::from_major_minor(120, 0));
        assert_eq!(o.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_details() {
        let mut o = order();
        o.add_ticket(ticket("201", 100));
        o.add_ticket(ticket("202", 150));
        o.update_status(OrderStatus::Confirmed);

        let details = o.details();
        assert_eq!(details.ticket_ids, vec!["201", "202"]);
        assert_eq!(details.total, Money::from_major_minor(250, 0));
        assert_eq!(details.payment.amount, details.total);
        assert_eq!(details.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
