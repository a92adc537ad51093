//! # Events
//!
//! Race events with a fixed seating capacity.
//!
//! Overselling is not an error: [`Event::update_sold_tickets`] reports it as
//! [`SeatReservation::InsufficientCapacity`], logs a warning and leaves the
//! sold count untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::ValidationError;

/// A race on the calendar.
///
/// A stored record selling more seats than the event holds fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub total_capacity: u32,
    pub sold_tickets: u32,
}

#[derive(Deserialize)]
struct EventRecord {
    id: String,
    name: String,
    date: NaiveDate,
    location: String,
    total_capacity: u32,
    sold_tickets: u32,
}

impl TryFrom<EventRecord> for Event {
    type Error = ValidationError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        if record.sold_tickets > record.total_capacity {
            return Err(ValidationError::OutOfRange {
                field: "sold tickets".to_string(),
                min: 0,
                max: record.total_capacity as i64,
            });
        }
        let mut event = Event::new(record.id, record.name, record.date, record.location, record.total_capacity);
        event.sold_tickets = record.sold_tickets;
        Ok(event)
    }
}

/// Outcome of asking an event for seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatReservation {
    /// Seats taken. `sold` is the new sold count.
    Reserved { sold: u32 },
    /// Not enough seats left. Nothing changed.
    InsufficientCapacity { requested: u32, available: u32 },
}

impl SeatReservation {
    pub fn is_reserved(&self) -> bool {
        matches!(self, SeatReservation::Reserved { .. })
    }
}

/// Event snapshot for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventDetails {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub location: String,
    pub total_capacity: u32,
    pub sold_tickets: u32,
    pub available_tickets: u32,
}

impl Event {
    /// Creates an event with nothing sold yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        location: impl Into<String>,
        total_capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date,
            location: location.into(),
            total_capacity,
            sold_tickets: 0,
        }
    }

    /// Seats still for sale.
    pub fn available_tickets(&self) -> u32 {
        self.total_capacity.saturating_sub(self.sold_tickets)
    }

    /// Takes `count` seats if they are all available.
    pub fn update_sold_tickets(&mut self, count: u32) -> SeatReservation {
        let available = self.available_tickets();
        if count > available {
            warn!(
                event_id = %self.id,
                requested = count,
                available,
                "Not enough tickets available"
            );
            return SeatReservation::InsufficientCapacity {
                requested: count,
                available,
            };
        }

        self.sold_tickets += count;
        debug!(event_id = %self.id, sold = self.sold_tickets, "Seats reserved");
        SeatReservation::Reserved {
            sold: self.sold_tickets,
        }
    }

    /// Puts seats back on sale, e.g. after a declined payment.
    pub fn release_tickets(&mut self, count: u32) {
        self.sold_tickets = self.sold_tickets.saturating_sub(count);
    }

    /// Case-insensitive substring match on the event name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }

    pub fn details(&self) -> EventDetails {
        EventDetails {
            id: self.id.clone(),
            name: self.name.clone(),
            date: self.date,
            location: self.location.clone(),
            total_capacity: self.total_capacity,
            sold_tickets: self.sold_tickets,
            available_tickets: self.available_tickets(),
        }
    }
}
