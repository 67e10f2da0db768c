//! # Cart Module
//!
//! The per-session working set of requested sale lines.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Cart Validation Flow                            │
//! │                                                                     │
//! │  Cashier action         Cart operation          Validation          │
//! │  ──────────────         ──────────────          ──────────          │
//! │  Click medicine ──────► add_line(snap, id) ───► qty+1 ≤ stock?     │
//! │  Type quantity  ──────► set_line_quantity() ──► qty ≤ stock?       │
//! │  Click remove   ──────► remove_line(id) ──────► (unconditional)    │
//! │  Checkout       ──────► SaleCommitter::commit (medipos-store)      │
//! │                                                                     │
//! │  Every check runs against the LATEST observed snapshot, not one    │
//! │  frozen at cart creation: another cashier may have deducted stock  │
//! │  since the last mutation.                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `medicine_id` (re-adding increments quantity)
//! - A line quantity never exceeds the stock observed at the time of the
//!   last successful validation
//! - A rejected mutation leaves the cart exactly as it was
//!
//! The cart is owned by a single session and is never persisted; commit,
//! explicit clear, or session end destroys it. Availability checks here
//! are advisory: the commit path re-validates against fresh state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::StockSnapshot;

/// A requested sale line: medicine reference plus requested quantity.
///
/// No price or name is frozen here. The cart always displays live data;
/// freezing happens at commit time when the SaleRecord is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Medicine id (UUID), resolved against the latest snapshot.
    pub medicine_id: String,

    /// Requested quantity, always ≥ 1.
    pub quantity: i64,
}

/// The per-session cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a medicine to the cart.
    ///
    /// ## Behavior
    /// - Not in cart yet: inserts a line with quantity 1
    /// - Already present: increments the line by 1
    ///
    /// Before applying, the resulting quantity is checked against the
    /// medicine's stock in `snapshot`. On rejection the cart is unchanged.
    ///
    /// ## Errors
    /// - [`CoreError::MedicineNotFound`] if the id is absent from the snapshot
    /// - [`CoreError::InsufficientStock`] if the increment would exceed stock
    pub fn add_line(&mut self, snapshot: &StockSnapshot, medicine_id: &str) -> CoreResult<()> {
        let medicine = snapshot
            .get(medicine_id)
            .ok_or_else(|| CoreError::MedicineNotFound(medicine_id.to_string()))?;

        let current = self.line_quantity(medicine_id).unwrap_or(0);
        let requested = current + 1;

        if requested > medicine.quantity {
            return Err(CoreError::InsufficientStock {
                medicine_id: medicine_id.to_string(),
                available: medicine.quantity,
                requested,
            });
        }

        match self.lines.iter_mut().find(|l| l.medicine_id == medicine_id) {
            Some(line) => line.quantity = requested,
            None => self.lines.push(CartLine {
                medicine_id: medicine_id.to_string(),
                quantity: 1,
            }),
        }

        Ok(())
    }

    /// Sets the quantity of a line directly.
    ///
    /// ## Behavior
    /// - `quantity ≤ 0`: removes the line (same as [`Cart::remove_line`])
    /// - `quantity` above observed stock: rejected, prior value kept
    /// - otherwise: replaces the line quantity (inserts if absent)
    ///
    /// ## Errors
    /// - [`CoreError::MedicineNotFound`] if the id is absent from the snapshot
    /// - [`CoreError::InsufficientStock`] carrying the available quantity
    pub fn set_line_quantity(
        &mut self,
        snapshot: &StockSnapshot,
        medicine_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_line(medicine_id);
            return Ok(());
        }

        let medicine = snapshot
            .get(medicine_id)
            .ok_or_else(|| CoreError::MedicineNotFound(medicine_id.to_string()))?;

        if quantity > medicine.quantity {
            return Err(CoreError::InsufficientStock {
                medicine_id: medicine_id.to_string(),
                available: medicine.quantity,
                requested: quantity,
            });
        }

        match self.lines.iter_mut().find(|l| l.medicine_id == medicine_id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine {
                medicine_id: medicine_id.to_string(),
                quantity,
            }),
        }

        Ok(())
    }

    /// Removes a line unconditionally. No-op if absent.
    pub fn remove_line(&mut self, medicine_id: &str) {
        self.lines.retain(|l| l.medicine_id != medicine_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Cart total at current snapshot prices, fixed 2-decimal.
    ///
    /// ## Errors
    /// [`CoreError::MedicineNotFound`] if a line's medicine has been hard
    /// deleted since it was added. The commit path surfaces the same error.
    pub fn total(&self, snapshot: &StockSnapshot) -> CoreResult<Money> {
        let mut total = Money::zero();
        for line in &self.lines {
            let medicine = snapshot
                .get(&line.medicine_id)
                .ok_or_else(|| CoreError::MedicineNotFound(line.medicine_id.clone()))?;
            total += medicine.price().multiply_quantity(line.quantity);
        }
        Ok(total)
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity currently requested for a medicine, if present.
    pub fn line_quantity(&self, medicine_id: &str) -> Option<i64> {
        self.lines
            .iter()
            .find(|l| l.medicine_id == medicine_id)
            .map(|l| l.quantity)
    }

    /// Total requested units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
