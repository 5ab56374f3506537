//! # Error Types
//!
//! Domain-specific error types for kkb-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kkb-core errors (this file)                                           │
//! │  ├── CoreError        - Umbrella for callers that mix both             │
//! │  ├── ValidationError  - Input rejected by a guarded edit               │
//! │  └── DecodeError      - Share token could not be read                  │
//! │                                                                         │
//! │  kkb-cli errors (app)                                                  │
//! │  └── CliError         - What the terminal user sees                    │
//! │                                                                         │
//! │  Nothing here is fatal: edits become no-ops, bad tokens become an      │
//! │  empty bill. The types exist so callers can tell WHY.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for code that both validates input and decodes tokens.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Share token error (wraps DecodeError).
    #[error("Invalid share token: {0}")]
    Decode(#[from] DecodeError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`]; the session layer turns them into
/// silent no-ops so a half-filled form never changes the bill.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a price that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Decode Error
// =============================================================================

/// Reasons a share token could not be turned back into a bill.
///
/// ## Caller Contract
/// ```text
/// token ──► decode() ──┬── Ok(BillState)   → use it
///                      │
///                      └── Err(DecodeError) → log, start from BillState::default()
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token was empty (or only whitespace/padding).
    #[error("token is empty")]
    Empty,

    /// The token exceeds the accepted length.
    #[error("token is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    /// The token is not URL-safe base64.
    #[error("token is not valid base64: {0}")]
    Encoding(String),

    /// The decoded bytes are not UTF-8 text.
    #[error("token payload is not UTF-8")]
    Utf8,

    /// The payload is not a bill in the expected shape.
    #[error("token payload is malformed: {0}")]
    Malformed(String),

    /// The payload was written by an incompatible format version.
    #[error("token version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The payload parsed but breaks a bill invariant.
    #[error("token describes an invalid bill: {0}")]
    Invalid(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with DecodeError.
pub type DecodeResult<T> = Result<T, DecodeError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "person".to_string(),
        };
        assert_eq!(err.to_string(), "person is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "name must be at most 200 characters");
    }

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::UnsupportedVersion {
            found: 9,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "token version 9 is not supported (expected 1)"
        );
        assert_eq!(DecodeError::Empty.to_string(), "token is empty");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "price".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = DecodeError::Utf8.into();
        assert!(matches!(core_err, CoreError::Decode(DecodeError::Utf8)));
    }
}
