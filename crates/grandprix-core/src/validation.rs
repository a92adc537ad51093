//! # Validation Module
//!
//! Input validation rules for the booking system.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Constructors and setters (Rust)                              │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Payment processing                                           │
//! │  └── Card checks decide Processed vs Failed (no error raised)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grandprix_core::validation::{validate_discount_code, validate_card_number};
//!
//! assert!(validate_discount_code("EID2025").is_ok());
//! assert!(validate_card_number("1234567812345678").is_ok());
//! assert!(validate_card_number("123456781234567").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Number of digits on a payment card.
pub const CARD_NUMBER_DIGITS: usize = 16;

/// Number of digits in a card security code.
pub const CVV_DIGITS: usize = 3;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, bounded text field (names, ids, labels).
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_required("username", username, 50)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with text on both sides
/// - Domain part contains a dot
///
/// ## Example
/// ```rust
/// use grandprix_core::validation::validate_email;
///
/// assert!(validate_email("salama@example.com").is_ok());
/// assert!(validate_email("salama.example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let mut parts = email.trim().split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(invalid()),
    };

    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - 7 to 15 digits, spaces and hyphens allowed as separators
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_required("phone", phone, 32)?;

    let body = phone.trim().strip_prefix('+').unwrap_or(phone.trim());
    if !body.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and hyphens".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have between 7 and 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount code.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Letters, numbers, hyphens and underscores only
pub fn validate_discount_code(code: &str) -> ValidationResult<()> {
    validate_required("discount code", code, 32)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "discount code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Card Validators
// =============================================================================

fn is_all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// Validates a card number: exactly 16 ASCII digits, no separators.
pub fn validate_card_number(number: &str) -> ValidationResult<()> {
    if !is_all_digits(number, CARD_NUMBER_DIGITS) {
        return Err(ValidationError::InvalidFormat {
            field: "card number".to_string(),
            reason: format!("must be exactly {} digits", CARD_NUMBER_DIGITS),
        });
    }
    Ok(())
}

/// Validates a card security code: exactly 3 ASCII digits.
pub fn validate_cvv(cvv: &str) -> ValidationResult<()> {
    if !is_all_digits(cvv, CVV_DIGITS) {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: format!("must be exactly {} digits", CVV_DIGITS),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount is not negative.
///
/// ## Rules
/// - Zero is allowed (complimentary tickets, empty orders)
///
/// ## Example
/// ```rust
/// use grandprix_core::money::Money;
/// use grandprix_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("amount", Money::from_cents(0)).is_ok());
/// assert!(validate_non_negative("amount", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("salama1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ghazlan@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0501111111").is_ok());
        assert!(validate_phone("+971 50 111 1111").is_ok());
        assert!(validate_phone("050-abc").is_err());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_validate_discount_code() {
        assert!(validate_discount_code("EID2025").is_ok());
        assert!(validate_discount_code("SPRING_2025-A").is_ok());
        assert!(validate_discount_code("").is_err());
        assert!(validate_discount_code("HAS SPACE").is_err());
        assert!(validate_discount_code(&"X".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_card_number() {
        assert!(validate_card_number("1234567812345678").is_ok());
        assert!(validate_card_number("123456781234567").is_err());
        assert!(validate_card_number("12345678123456789").is_err());
        assert!(validate_card_number("1234-5678-1234-5678").is_err());
        assert!(validate_card_number("abcdefghijklmnop").is_err());
    }

    #[test]
    fn test_validate_cvv() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("12").is_err());
        assert!(validate_cvv("1234").is_err());
        assert!(validate_cvv("12a").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("price", Money::zero()).is_ok());
        assert!(validate_non_negative("price", Money::from_cents(1099)).is_ok());
        assert!(validate_non_negative("price", Money::from_cents(-100)).is_err());
    }
}
