//! # Error Types
//!
//! Domain-specific error types for medipos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  medipos-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  medipos-store errors (separate crate)                              │
//! │  ├── StoreError       - Database operation failures                 │
//! │  ├── LedgerError      - Domain or store failure on a ledger op      │
//! │  └── CommitError      - Checkout failures incl. partial commits     │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → LedgerError/CommitError        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (medicine id, available quantity)
//! 3. Errors are enum variants, never String
//! 4. A caller can always tell a retryable rejection (insufficient stock)
//!    from a non-retryable one (validation, not found)

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. Collaborator failures (I/O,
/// SQL) never appear here; they belong to the store layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced medicine no longer exists in the observed snapshot
    /// or the ledger.
    ///
    /// Not retried automatically: the id is simply gone (hard delete).
    #[error("Medicine not found: {0}")]
    MedicineNotFound(String),

    /// Requested quantity exceeds the currently available stock.
    ///
    /// Carries the available quantity so the caller may retry with an
    /// adjusted amount.
    ///
    /// ## When This Occurs
    /// - A cart mutation would push a line past observed stock
    /// - Commit-time re-validation detects a race with another cashier
    /// - A deduction loses the final conditional update
    #[error("Insufficient stock for {medicine_id}: available {available}, requested {requested}")]
    InsufficientStock {
        medicine_id: String,
        available: i64,
        requested: i64,
    },

    /// Commit was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet requirements, before any business
/// logic runs. Caller's fault, never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::InsufficientStock {
            medicine_id: "med-42".to_string(),
            available: 17,
            requested: 25,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for med-42: available 17, requested 25"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
