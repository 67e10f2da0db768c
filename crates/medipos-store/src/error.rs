//! # Store Error Types
//!
//! Error types for the storage layer and the commit path.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  SQLite error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError ← infrastructure failures, categorized                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  LedgerError / CommitError ← joins domain rules (medipos-core)      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Caller (UI / operator tooling) — errors surfaced unmodified in     │
//! │  kind; a failed deduction is never reported as success.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use medipos_core::{CoreError, ValidationError};
use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Database operation errors.
///
/// These wrap sqlx errors with context. Domain rejections (insufficient
/// stock, empty cart) never appear here; see [`LedgerError`] and
/// [`CommitError`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row not found where one was required.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// CHECK constraint violation.
    ///
    /// The schema repeats the domain's numeric invariants (quantity ≥ 0,
    /// price ≥ 0) as CHECK constraints; hitting one means a write slipped
    /// past validation and was stopped at the last line of defense.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "CHECK constraint failed: <constraint>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("CHECK constraint failed")
                    || msg.contains("FOREIGN KEY constraint failed")
                {
                    StoreError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for raw store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// A stock ledger operation failure: either a domain rejection (not found,
/// insufficient stock, validation) or an infrastructure failure.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Domain(CoreError::Validation(err))
    }
}

// =============================================================================
// Commit Error
// =============================================================================

/// A single failed deduction within an otherwise journaled sale.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeductionFailure {
    pub medicine_id: String,
    pub quantity: i64,
    pub reason: String,
}

impl std::fmt::Display for DeductionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (qty {}): {}",
            self.medicine_id, self.quantity, self.reason
        )
    }
}

/// Sale commit failures.
///
/// `PartialCommit` is the one state an operator must act on: the journal
/// already holds the sale (append-only, not rolled back) but one or more
/// stock deductions failed, leaving a ledger/journal mismatch to reconcile
/// manually. It is never folded into a plain failure or swallowed.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Pre-commit rejection: empty cart, oversold line, vanished medicine.
    /// Nothing was written; safe to fix the cart and retry.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Infrastructure failure before the journal append; nothing written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The sale was appended to the journal but deductions failed.
    #[error("Sale {sale_id} was journaled but some deductions failed; manual reconciliation required")]
    PartialCommit {
        sale_id: String,
        failures: Vec<DeductionFailure>,
    },
}

impl From<LedgerError> for CommitError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Domain(e) => CommitError::Domain(e),
            LedgerError::Store(e) => CommitError::Store(e),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_commit_message_names_sale() {
        let err = CommitError::PartialCommit {
            sale_id: "sale-9".to_string(),
            failures: vec![DeductionFailure {
                medicine_id: "med-1".to_string(),
                quantity: 2,
                reason: "Medicine not found: med-1".to_string(),
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("sale-9"));
        assert!(msg.contains("reconciliation"));
    }

    #[test]
    fn test_deduction_failure_display() {
        let failure = DeductionFailure {
            medicine_id: "med-1".to_string(),
            quantity: 3,
            reason: "gone".to_string(),
        };
        assert_eq!(failure.to_string(), "med-1 (qty 3): gone");
    }

    #[test]
    fn test_ledger_error_from_validation() {
        let err: LedgerError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::Validation(_))
        ));
    }
}
