//! # Validation Module
//!
//! Input validation for ledger mutations and cart requests.
//!
//! Validation runs before any business logic or SQL: a `ValidationError`
//! means the input itself was malformed, regardless of ledger state. The
//! database repeats the numeric range rules as CHECK constraints, so bad
//! data cannot land even if a caller bypasses this layer.

use crate::error::ValidationError;
use crate::types::{MedicineUpdate, NewMedicine};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a medicine name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_medicine_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a stock quantity.
///
/// Zero is allowed: a medicine can be out of stock without being deleted.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a requested sale quantity (cart line or deduction).
///
/// Unlike stock levels, a request for zero units is meaningless.
pub fn validate_requested_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// Zero is allowed (free samples).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an actor id (cashier/pharmacist).
///
/// The id is opaque to the core; only emptiness is rejected.
pub fn validate_actor_id(actor_id: &str) -> ValidationResult<()> {
    if actor_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "actor_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the full field set for creating a medicine.
pub fn validate_new_medicine(fields: &NewMedicine) -> ValidationResult<()> {
    validate_medicine_name(&fields.name)?;
    validate_stock_quantity(fields.quantity)?;
    validate_price_cents(fields.price_cents)?;
    Ok(())
}

/// Validates the full field set for editing a medicine.
pub fn validate_medicine_update(fields: &MedicineUpdate) -> ValidationResult<()> {
    validate_medicine_name(&fields.name)?;
    validate_stock_quantity(fields.quantity)?;
    validate_price_cents(fields.price_cents)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
