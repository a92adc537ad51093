//! # Booking System
//!
//! The facade a front end talks to. It owns the account directory, the event
//! calendar and the discount codes, and runs a booking end to end.
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  book_tickets(request, today)                                           │
//! │                                                                         │
//! │  1. customer, event, discount code exist?  ── no ──► CoreError          │
//! │  2. build order from tickets valid today ── no ──► TicketUnavailable    │
//! │  3. reserve seats on the event ───── not enough ──► SoldOut             │
//! │  4. apply discount code (ignored if expired or inactive), then the      │
//! │     customer's standing discount                                        │
//! │  5. process payment ──────────────── declined ────► seats released,     │
//! │                                                     PaymentDeclined     │
//! │  6. order → Paid, appended to the customer's history ──► Booked         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::account::{Admin, Customer, Directory, SalesReport, User};
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::event::{Event, SeatReservation};
use crate::money::Money;
use crate::order::{Order, OrderStatus};
use crate::payment::{Payment, PaymentStatus};
use crate::ticket::{Priceable, Ticket};

// =============================================================================
// Requests & Outcomes
// =============================================================================

/// Everything needed to book tickets for one event.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer_id: String,
    pub event_id: String,
    pub tickets: Vec<Ticket>,
    pub payment: Payment,
    pub discount_code: Option<String>,
}

/// What happened to a booking that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Paid and recorded in the customer's history.
    Booked { order_id: String, total: Money },
    /// The event could not seat the whole order. Nothing changed.
    SoldOut { requested: u32, available: u32 },
    /// The payment failed. The seats went back on sale.
    PaymentDeclined { order_id: String },
}

/// Serializable state of a whole booking system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub customers: Vec<Customer>,
    pub admins: Vec<Admin>,
    pub events: Vec<Event>,
    pub discounts: Vec<Discount>,
}

// =============================================================================
// Booking System
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct BookingSystem {
    directory: Directory,
    events: Vec<Event>,
    discounts: Vec<Discount>,
}

impl BookingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a system from stored state.
    ///
    /// Duplicate user ids, usernames, event ids or discount codes in the
    /// snapshot are rejected.
    pub fn from_snapshot(snapshot: SystemSnapshot) -> Result<Self, ValidationError> {
        let mut system = Self {
            directory: Directory::from_parts(snapshot.customers, snapshot.admins)?,
            events: Vec::new(),
            discounts: Vec::new(),
        };
        for event in snapshot.events {
            let id = event.id.clone();
            if !system.add_event(event) {
                return Err(ValidationError::Duplicate {
                    field: "event id".to_string(),
                    value: id,
                });
            }
        }
        for discount in snapshot.discounts {
            system.add_discount(discount)?;
        }
        Ok(system)
    }

    /// Copies the current state out for storage.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            customers: self.directory.customers().to_vec(),
            admins: self.directory.admins().to_vec(),
            events: self.events.clone(),
            discounts: self.discounts.clone(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    /// Looks a code up, ignoring surrounding whitespace.
    pub fn find_discount(&self, code: &str) -> Option<&Discount> {
        let code = code.trim();
        self.discounts.iter().find(|d| d.code == code)
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    pub fn register_customer(&mut self, customer: Customer) -> Result<(), ValidationError> {
        self.directory.register_customer(customer)
    }

    pub fn register_admin(&mut self, admin: Admin) -> Result<(), ValidationError> {
        self.directory.register_admin(admin)
    }

    pub fn login(&self, username: &str, password: &str) -> Option<&User> {
        self.directory.login(username, password)
    }

    pub fn sales_report(&mut self, admin_id: &str) -> CoreResult<SalesReport> {
        self.directory.sales_report(admin_id)
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Lists an event. Returns `false` if the id is already taken.
    pub fn add_event(&mut self, event: Event) -> bool {
        if self.event(&event.id).is_some() {
            return false;
        }
        info!(event_id = %event.id, name = %event.name, "Event added");
        self.events.push(event);
        true
    }

    /// Events whose name contains `query`, ignoring case.
    pub fn search_events(&self, query: &str) -> Vec<&Event> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.events.iter().filter(|e| e.name_matches(query)).collect()
    }

    /// Adds a discount code. Codes are unique.
    pub fn add_discount(&mut self, discount: Discount) -> Result<(), ValidationError> {
        if self.find_discount(&discount.code).is_some() {
            return Err(ValidationError::Duplicate {
                field: "discount code".to_string(),
                value: discount.code,
            });
        }
        self.discounts.push(discount);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Booking
    // -------------------------------------------------------------------------

    /// Books tickets for one event. See the module docs for the flow.
    ///
    /// ## Errors
    /// - `CustomerNotFound`, `EventNotFound`, `DiscountNotFound`
    /// - `Validation(Required)` when the request holds no tickets
    /// - `TicketUnavailable` for a ticket off sale or dated before `today`
    pub fn book_tickets(&mut self, request: BookingRequest, today: NaiveDate) -> CoreResult<BookingOutcome> {
        let BookingRequest {
            customer_id,
            event_id,
            tickets,
            payment,
            discount_code,
        } = request;

        let standing = match self.directory.customer(&customer_id) {
            Some(customer) => customer.discount(),
            None => return Err(CoreError::CustomerNotFound(customer_id)),
        };
        let discount = match discount_code {
            Some(code) => Some(
                self.find_discount(&code)
                    .cloned()
                    .ok_or(CoreError::DiscountNotFound(code))?,
            ),
            None => None,
        };

        let mut order = Order::new(crate::new_id(), customer_id.as_str(), today, payment);
        for ticket in tickets {
            if !ticket.is_valid_on(today) {
                return Err(CoreError::TicketUnavailable {
                    ticket_id: ticket.id().to_string(),
                    date: today.to_string(),
                });
            }
            order.add_ticket(ticket);
        }
        if order.ticket_count() == 0 {
            return Err(ValidationError::Required {
                field: "tickets".to_string(),
            }
            .into());
        }
        let seats = order.ticket_count() as u32;

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CoreError::EventNotFound(event_id.clone()))?;
        if let SeatReservation::InsufficientCapacity { requested, available } = event.update_sold_tickets(seats) {
            return Ok(BookingOutcome::SoldOut { requested, available });
        }

        if let Some(discount) = &discount {
            if !order.apply_discount_on(discount, today) {
                warn!(code = %discount.code, "Discount code not valid today, charging full price");
            }
        }
        order.apply_percentage(standing);

        match order.process_payment_on(today) {
            PaymentStatus::Processed => {}
            status => {
                event.release_tickets(seats);
                warn!(order_id = %order.id(), %status, "Booking declined, seats released");
                return Ok(BookingOutcome::PaymentDeclined {
                    order_id: order.id().to_string(),
                });
            }
        }

        order.transition_to(OrderStatus::Paid)?;
        let order_id = order.id().to_string();
        let total = self.directory.place_order(order)?;
        info!(%order_id, %event_id, seats, total = %total, "Booking completed");

        Ok(BookingOutcome::Booked { order_id, total })
    }

    /// Seats sold per event name, for events that sold at least one.
    pub fn sales_by_event(&self) -> BTreeMap<String, u32> {
        let mut report = BTreeMap::new();
        for event in self.events.iter().filter(|e| e.sold_tickets > 0) {
            *report.entry(event.name.clone()).or_insert(0) += event.sold_tickets;
        }
        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
