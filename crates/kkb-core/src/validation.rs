//! # Validation Module
//!
//! Input rules applied before anything is added to a bill.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Guarded Edits                                      │
//! │                                                                         │
//! │  Form input ──► validate_*() ──┬── Ok  → entity is created and added   │
//! │                                │                                        │
//! │                                └── Err → the edit is a NO-OP           │
//! │                                          (logged at debug, never shown │
//! │                                           as a failure to the user)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative prices are NOT rejected here; the bill keeps whatever
//! arithmetic the user asked for.

use crate::amount::Amount;
use crate::error::ValidationError;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name or person name.
///
/// ## Rules
/// - Surrounding whitespace is trimmed
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` characters (not bytes)
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use kkb_core::validation::validate_name;
///
/// assert_eq!(validate_name("person", "  José ").unwrap(), "José");
/// assert!(validate_name("person", "   ").is_err());
/// ```
pub fn validate_name(field: &str, input: &str) -> ValidationResult<String> {
    let name = input.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price entered as text.
///
/// ## Rules
/// - Must not be empty
/// - Must start with a number (see [`Amount::parse`])
/// - Zero and negative values are accepted
///
/// ## Example
/// ```rust
/// use kkb_core::validation::validate_price;
///
/// assert_eq!(validate_price("12.50").unwrap().value(), 12.5);
/// assert!(validate_price("").is_err());
/// assert!(validate_price("free").is_err());
/// ```
pub fn validate_price(input: &str) -> ValidationResult<Amount> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    Amount::parse(input).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a number".to_string(),
    })
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the people a shared item is split between.
///
/// ## Rules
/// - Each name is trimmed; blank names are dropped
/// - Duplicates are dropped, keeping the first occurrence
/// - At least one person must remain
///
/// ## Returns
/// The cleaned list in selection order.
pub fn validate_shared_by<S: AsRef<str>>(people: &[S]) -> ValidationResult<Vec<String>> {
    let mut cleaned: Vec<String> = Vec::with_capacity(people.len());

    for person in people {
        let person = person.as_ref().trim();
        if person.is_empty() || cleaned.iter().any(|p| p == person) {
            continue;
        }
        cleaned.push(person.to_string());
    }

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: "shared by".to_string(),
        });
    }

    Ok(cleaned)
}

// =============================================================================
// Unit Tests
// =============================================================================
