//! # Error Types
//!
//! Domain-specific error types for grandprix-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  grandprix-core errors (this file)                                     │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  grandprix-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - A missing user or event at lookup: `Option::None`
//! - Selling past capacity: [`crate::event::SeatReservation::InsufficientCapacity`]
//! - A declined card: [`crate::payment::PaymentStatus::Failed`]

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No customer with this id is registered.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// No admin with this id is registered.
    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    /// No event with this id is listed.
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// A booking named a discount code that was never added.
    #[error("Discount code not found: {0}")]
    DiscountNotFound(String),

    /// A booking asked for a ticket that is off sale or whose event is over.
    #[error("Ticket {ticket_id} is not valid for sale on {date}")]
    TicketUnavailable { ticket_id: String, date: String },

    /// An order was handed to a customer it does not belong to.
    ///
    /// ## When This Occurs
    /// - `Customer::place_order` with an order built for someone else
    #[error("Order {order_id} belongs to customer {expected}, not {actual}")]
    CustomerMismatch {
        order_id: String,
        expected: String,
        actual: String,
    },

    /// Order status change rejected by the strict transition table.
    ///
    /// ## User Workflow
    /// ```text
    /// Order (Paid)
    ///      │
    ///      ▼
    /// transition_to(Cancelled)
    ///      │
    ///      ▼
    /// InvalidOrderTransition { from: "paid", to: "cancelled" }
    /// ```
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidOrderTransition {
        order_id: String,
        from: String,
        to: String,
    },

    /// Refund requested for a payment that was never processed.
    #[error("Payment {payment_id} cannot be refunded from status {status}")]
    RefundNotAllowed { payment_id: String, status: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at construction or setter time. The value being built or updated is
/// left exactly as it was before the call.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., card number, email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date range ends before it starts.
    #[error("{field} ends ({until}) before it starts ({from})")]
    InvalidRange {
        field: String,
        from: String,
        until: String,
    },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate user id or discount code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidOrderTransition {
            order_id: "5001".to_string(),
            from: "paid".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(err.to_string(), "Order 5001 cannot move from paid to pending");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "discount percentage must be between 0 and 100"
        );

        let err = ValidationError::Negative {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "username".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
