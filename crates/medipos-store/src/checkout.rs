//! # Sale Commit Path
//!
//! Turns a validated cart into a permanent journal record plus stock
//! deductions.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Sale Commit Sequence                          │
//! │                                                                     │
//! │  1. Reject an empty cart                                            │
//! │  2. Read a FRESH snapshot and re-validate every line against it     │
//! │     (cart-time checks were advisory; stock may have moved since)    │
//! │  3. Freeze lines: name + unit price captured from the fresh read    │
//! │  4. Append the sale to the journal (atomic record write)            │
//! │  5. Fan out one conditional deduction per line                      │
//! │  6. All applied → clear the cart, return the sale id                │
//! │     Any failed  → PartialCommit{sale_id, failures}                  │
//! │                                                                     │
//! │  Steps 4 and 5 are NOT one transaction. The journal is append-only  │
//! │  and is never rolled back: once step 4 lands the sale is history,   │
//! │  and deduction failures are surfaced for manual reconciliation      │
//! │  instead of silently un-writing the record.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{CommitError, DeductionFailure};
use crate::journal::SalesJournal;
use crate::ledger::StockLedger;
use medipos_core::validation::validate_actor_id;
use medipos_core::{Cart, CoreError, Money, SaleLine, SaleRecord};

/// Commits carts against the ledger and journal.
#[derive(Debug, Clone)]
pub struct SaleCommitter {
    ledger: StockLedger,
    journal: SalesJournal,
}

impl SaleCommitter {
    /// Creates a committer over a shared ledger and journal.
    pub fn new(ledger: StockLedger, journal: SalesJournal) -> Self {
        SaleCommitter { ledger, journal }
    }

    /// Commits the cart as a sale.
    ///
    /// On success the cart is cleared and the new sale id returned. On any
    /// pre-append rejection (empty cart, vanished medicine, insufficient
    /// stock, infrastructure) nothing has been written and the cart is left
    /// intact for correction.
    ///
    /// ## Errors
    /// - [`CommitError::Domain`] for pre-append rejections
    /// - [`CommitError::Store`] for infrastructure failures before append
    /// - [`CommitError::PartialCommit`] when the sale was journaled but one
    ///   or more deductions failed; the cart is NOT cleared
    pub async fn commit(&self, cart: &mut Cart, cashier_id: &str) -> Result<String, CommitError> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_actor_id(cashier_id).map_err(CoreError::from)?;

        // Fresh read; the cart's own snapshot may be arbitrarily stale.
        let snapshot = self.ledger.snapshot().await?;

        let mut lines = Vec::with_capacity(cart.lines().len());
        let mut total = Money::zero();
        for line in cart.lines() {
            let medicine = snapshot
                .get(&line.medicine_id)
                .ok_or_else(|| CoreError::MedicineNotFound(line.medicine_id.clone()))?;

            if line.quantity > medicine.quantity {
                return Err(CoreError::InsufficientStock {
                    medicine_id: line.medicine_id.clone(),
                    available: medicine.quantity,
                    requested: line.quantity,
                }
                .into());
            }

            let frozen = SaleLine {
                medicine_id: medicine.id.clone(),
                name: medicine.name.clone(),
                quantity: line.quantity,
                unit_price_cents: medicine.price_cents,
            };
            total += frozen.subtotal();
            lines.push(frozen);
        }

        let sale = SaleRecord {
            id: Uuid::new_v4().to_string(),
            lines,
            total_cents: total.cents(),
            created_at: Utc::now(),
            cashier_id: cashier_id.to_string(),
        };

        // The point of no return: after this append the sale is permanent.
        self.journal.append(&sale).await?;

        self.apply_deductions(&sale).await?;

        info!(
            id = %sale.id,
            total_cents = %sale.total_cents,
            lines = sale.lines.len(),
            cashier = %sale.cashier_id,
            "Sale committed"
        );

        cart.clear();
        Ok(sale.id)
    }

    /// Fans out one conditional deduction per journaled line.
    ///
    /// Failures are collected rather than short-circuited, so an operator
    /// reconciling a partial commit sees every affected line at once.
    async fn apply_deductions(&self, sale: &SaleRecord) -> Result<(), CommitError> {
        let mut failures = Vec::new();
        for line in &sale.lines {
            if let Err(e) = self
                .ledger
                .deduct(&line.medicine_id, line.quantity, &sale.cashier_id)
                .await
            {
                warn!(
                    sale_id = %sale.id,
                    medicine_id = %line.medicine_id,
                    qty = %line.quantity,
                    error = %e,
                    "Deduction failed after journal append"
                );
                failures.push(DeductionFailure {
                    medicine_id: line.medicine_id.clone(),
                    quantity: line.quantity,
                    reason: e.to_string(),
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CommitError::PartialCommit {
                sale_id: sale.id.clone(),
                failures,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
