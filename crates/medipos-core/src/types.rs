//! # Domain Types
//!
//! Core domain types used throughout MediPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │ MedicineRecord │   │   SaleRecord   │   │    SaleLine    │      │
//! │  │ ────────────── │   │ ────────────── │   │ ────────────── │      │
//! │  │ id (UUID)      │   │ id (UUID)      │   │ medicine_id    │      │
//! │  │ name           │   │ lines          │   │ name (frozen)  │      │
//! │  │ quantity ≥ 0   │   │ total_cents    │   │ quantity       │      │
//! │  │ price_cents    │   │ cashier_id     │   │ unit_price     │      │
//! │  │ expiry_date?   │   │ created_at     │   │   (frozen)     │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! │                                                                     │
//! │  StockSnapshot: the full ledger as observed at one feed delivery.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleLine` freezes medicine name and unit price at commit time, so
//! historical sales remain accurate after later price edits. A sale record
//! is immutable once written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Medicine Record
// =============================================================================

/// A medicine tracked by the stock ledger.
///
/// Invariants (enforced by validation and a database CHECK constraint):
/// quantity never negative, price never negative and stored as fixed
/// 2-decimal integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MedicineRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, non-empty. The ledger listing is ordered by name.
    pub name: String,

    /// Units currently on the shelf.
    pub quantity: i64,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Optional expiry date. Medicines without one never raise the
    /// expiring-soon alert.
    pub expiry_date: Option<NaiveDate>,

    /// Stamped on every mutation, including sale deductions.
    pub last_updated: DateTime<Utc>,

    /// Actor id of the last mutation. Opaque to the core.
    pub updated_by: String,
}

impl MedicineRecord {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the quantity is at or below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= LOW_STOCK_THRESHOLD
    }
}

/// Fields for creating a new medicine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub expiry_date: Option<NaiveDate>,
}

/// Fields for editing a medicine.
///
/// The edit operation replaces the full editable field set, mirroring a
/// pharmacist submitting the edit form. Identity and audit stamps are not
/// editable; the ledger stamps `last_updated`/`updated_by` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineUpdate {
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub expiry_date: Option<NaiveDate>,
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// The full stock ledger as observed at one point of the live feed.
///
/// The feed delivers a complete refreshed snapshot on every underlying
/// change, not deltas. Consumers (cart validation, alert evaluation) always
/// work against the latest snapshot they received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    medicines: Vec<MedicineRecord>,
}

impl StockSnapshot {
    /// Creates a snapshot from an already name-ordered listing.
    pub fn new(medicines: Vec<MedicineRecord>) -> Self {
        StockSnapshot { medicines }
    }

    /// Looks up a medicine by id.
    pub fn get(&self, id: &str) -> Option<&MedicineRecord> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// All medicines in ledger order (by name).
    pub fn medicines(&self) -> &[MedicineRecord] {
        &self.medicines
    }

    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }
}

impl From<Vec<MedicineRecord>> for StockSnapshot {
    fn from(medicines: Vec<MedicineRecord>) -> Self {
        StockSnapshot::new(medicines)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A line item in a committed sale.
///
/// Uses the snapshot pattern: name and unit price are frozen at commit
/// time and stay accurate after later edits to the medicine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    /// Medicine sold (reference, may dangle after a hard delete).
    pub medicine_id: String,
    /// Medicine name at time of sale (frozen).
    pub name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A committed sale.
///
/// Immutable once written; the journal is append-only and exposes no
/// update or delete operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    /// Ordered line items, frozen at commit time.
    pub lines: Vec<SaleLine>,
    /// Sum of line subtotals in cents.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    /// Cashier actor id. Opaque to the core.
    pub cashier_id: String,
}

impl SaleRecord {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total units sold across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(id: &str, name: &str, quantity: i64) -> MedicineRecord {
        MedicineRecord {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            price_cents: 150,
            expiry_date: None,
            last_updated: Utc::now(),
            updated_by: "test".to_string(),
        }
    }

    #[test]
    fn test_low_stock_flag() {
        assert!(medicine("1", "Aspirin", 0).is_low_stock());
        assert!(medicine("1", "Aspirin", 10).is_low_stock());
        assert!(!medicine("1", "Aspirin", 11).is_low_stock());
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = StockSnapshot::new(vec![
            medicine("a", "Aspirin", 5),
            medicine("b", "Paracetamol", 20),
        ]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("b").unwrap().name, "Paracetamol");
        assert!(snapshot.get("missing").is_none());
    }

    #[test]
    fn test_sale_line_subtotal() {
        let line = SaleLine {
            medicine_id: "a".to_string(),
            name: "Paracetamol".to_string(),
            quantity: 3,
            unit_price_cents: 150,
        };
        assert_eq!(line.subtotal().cents(), 450);
    }

    #[test]
    fn test_sale_total_quantity() {
        let sale = SaleRecord {
            id: "s1".to_string(),
            lines: vec![
                SaleLine {
                    medicine_id: "a".to_string(),
                    name: "Aspirin".to_string(),
                    quantity: 2,
                    unit_price_cents: 100,
                },
                SaleLine {
                    medicine_id: "b".to_string(),
                    name: "Paracetamol".to_string(),
                    quantity: 3,
                    unit_price_cents: 150,
                },
            ],
            total_cents: 650,
            created_at: Utc::now(),
            cashier_id: "c1".to_string(),
        };
        assert_eq!(sale.total_quantity(), 5);
        assert_eq!(sale.total().cents(), 650);
    }
}
