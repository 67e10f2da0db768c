//! # Stock Ledger Service
//!
//! The authoritative medicine → quantity/price/expiry mapping, combining
//! the repository with live feed publication.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Ledger Mutation                            │
//! │                                                                     │
//! │  create / update / delete / deduct                                  │
//! │       │                                                             │
//! │       ├── 1. validate input (medipos-core::validation)              │
//! │       ├── 2. execute SQL (MedicineRepository)                       │
//! │       └── 3. re-read full listing, publish snapshot on the feed     │
//! │                                                                     │
//! │  Subscribers (alert evaluation, cart-holding sessions) receive the  │
//! │  complete refreshed snapshot, ordered by name.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Availability information read through the feed is advisory only; the
//! commit path re-validates against a direct repository read and the
//! deduction itself is a conditional atomic update.

use tracing::{debug, info};

use crate::error::{LedgerError, StoreResult};
use crate::feed::{Feed, Subscription};
use crate::pool::Database;
use crate::repository::medicine::{DeductOutcome, MedicineRepository};
use medipos_core::validation::{
    validate_actor_id, validate_medicine_update, validate_new_medicine,
    validate_requested_quantity,
};
use medipos_core::{CoreError, MedicineRecord, MedicineUpdate, NewMedicine, StockSnapshot};

/// The stock ledger: repository plus live snapshot feed.
///
/// Cloning shares the same feed and pool; every clone observes and
/// publishes the same state.
#[derive(Debug, Clone)]
pub struct StockLedger {
    repo: MedicineRepository,
    feed: Feed<StockSnapshot>,
}

impl StockLedger {
    /// Creates a ledger over the given database, seeding the feed with
    /// the current listing.
    pub async fn new(db: &Database) -> StoreResult<Self> {
        let repo = db.medicines();
        let initial = StockSnapshot::from(repo.list().await?);
        Ok(StockLedger {
            repo,
            feed: Feed::new(initial),
        })
    }

    /// Subscribes to the live snapshot feed.
    pub fn subscribe(&self) -> Subscription<StockSnapshot> {
        self.feed.subscribe()
    }

    /// Lists all medicines ordered by name (direct, authoritative read).
    pub async fn list(&self) -> StoreResult<Vec<MedicineRecord>> {
        self.repo.list().await
    }

    /// Reads a fresh snapshot directly from storage.
    pub async fn snapshot(&self) -> StoreResult<StockSnapshot> {
        Ok(StockSnapshot::from(self.repo.list().await?))
    }

    /// Gets a medicine by id.
    pub async fn get(&self, id: &str) -> Result<MedicineRecord, LedgerError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::MedicineNotFound(id.to_string()).into())
    }

    /// Creates a medicine and returns its generated id.
    ///
    /// Fails with a validation error on an empty name or a negative
    /// quantity/price, before anything touches storage.
    pub async fn create(&self, fields: NewMedicine, actor_id: &str) -> Result<String, LedgerError> {
        validate_new_medicine(&fields)?;
        validate_actor_id(actor_id)?;

        let id = self.repo.insert(&fields, actor_id).await?;
        info!(id = %id, name = %fields.name, "Medicine created");

        self.refresh().await?;
        Ok(id)
    }

    /// Replaces the editable fields of a medicine, stamping the audit
    /// columns.
    pub async fn update(
        &self,
        id: &str,
        fields: MedicineUpdate,
        actor_id: &str,
    ) -> Result<(), LedgerError> {
        validate_medicine_update(&fields)?;
        validate_actor_id(actor_id)?;

        let affected = self.repo.update(id, &fields, actor_id).await?;
        if affected == 0 {
            return Err(CoreError::MedicineNotFound(id.to_string()).into());
        }
        debug!(id = %id, "Medicine updated");

        self.refresh().await?;
        Ok(())
    }

    /// Hard-deletes a medicine.
    ///
    /// The confirmation step belongs to the UI; by the time this runs the
    /// only remaining failure is an id already gone, surfaced as not-found.
    pub async fn delete(&self, id: &str) -> Result<(), LedgerError> {
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(CoreError::MedicineNotFound(id.to_string()).into());
        }
        info!(id = %id, "Medicine deleted");

        self.refresh().await?;
        Ok(())
    }

    /// Deducts stock via a conditional atomic decrement.
    ///
    /// A racing deduction that would push quantity negative applies zero
    /// rows and surfaces as insufficient stock with the fresh available
    /// quantity - never a blind decrement from a stale read.
    pub async fn deduct(&self, id: &str, qty: i64, actor_id: &str) -> Result<(), LedgerError> {
        validate_requested_quantity(qty)?;

        match self.repo.deduct(id, qty, actor_id).await? {
            DeductOutcome::Applied => {
                debug!(id = %id, qty = %qty, "Stock deducted");
                self.refresh().await?;
                Ok(())
            }
            DeductOutcome::NotFound => Err(CoreError::MedicineNotFound(id.to_string()).into()),
            DeductOutcome::Insufficient { available } => Err(CoreError::InsufficientStock {
                medicine_id: id.to_string(),
                available,
                requested: qty,
            }
            .into()),
        }
    }

    /// Re-reads the listing and publishes a full refreshed snapshot.
    async fn refresh(&self) -> StoreResult<()> {
        let snapshot = StockSnapshot::from(self.repo.list().await?);
        self.feed.publish(snapshot);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use chrono::NaiveDate;
    use medipos_core::ValidationError;

    async fn ledger() -> StockLedger {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        StockLedger::new(&db).await.unwrap()
    }

    fn fields(name: &str, quantity: i64, price_cents: i64) -> NewMedicine {
        NewMedicine {
            name: name.to_string(),
            quantity,
            price_cents,
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_before_storage() {
        let ledger = ledger().await;

        let err = ledger
            .create(fields("", 10, 100), "ph1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = ledger
            .create(fields("Aspirin", -1, 100), "ph1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::Validation(
                ValidationError::MustBeNonNegative { .. }
            ))
        ));

        let err = ledger
            .create(fields("Aspirin", 1, -100), "ph1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::Validation(
                ValidationError::MustBeNonNegative { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_mutations_publish_refreshed_snapshots() {
        let ledger = ledger().await;
        let mut sub = ledger.subscribe();
        assert!(sub.latest().is_empty());

        let id = ledger
            .create(fields("Paracetamol", 20, 150), "ph1")
            .await
            .unwrap();
        assert!(sub.changed().await);
        let snap = sub.latest();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(&id).unwrap().quantity, 20);

        ledger.deduct(&id, 3, "c1").await.unwrap();
        assert!(sub.changed().await);
        assert_eq!(sub.latest().get(&id).unwrap().quantity, 17);

        ledger.delete(&id).await.unwrap();
        assert!(sub.changed().await);
        assert!(sub.latest().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_stamps_actor() {
        let ledger = ledger().await;
        let id = ledger
            .create(fields("Paracetamol", 20, 150), "ph1")
            .await
            .unwrap();

        let update = MedicineUpdate {
            name: "Paracetamol 500mg".to_string(),
            quantity: 35,
            price_cents: 175,
            expiry_date: NaiveDate::from_ymd_opt(2027, 6, 1),
        };
        ledger.update(&id, update, "ph2").await.unwrap();

        let medicine = ledger.get(&id).await.unwrap();
        assert_eq!(medicine.name, "Paracetamol 500mg");
        assert_eq!(medicine.quantity, 35);
        assert_eq!(medicine.price_cents, 175);
        assert_eq!(medicine.updated_by, "ph2");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let ledger = ledger().await;
        let update = MedicineUpdate {
            name: "Ghost".to_string(),
            quantity: 1,
            price_cents: 1,
            expiry_date: None,
        };

        let err = ledger.update("ghost", update, "ph1").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::MedicineNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let ledger = ledger().await;
        let err = ledger.delete("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::MedicineNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_deduct_insufficient_carries_available() {
        let ledger = ledger().await;
        let id = ledger
            .create(fields("Aspirin", 2, 100), "ph1")
            .await
            .unwrap();

        let err = ledger.deduct(&id, 5, "c1").await.unwrap_err();
        match err {
            LedgerError::Domain(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_deduct_rejects_nonpositive_quantity() {
        let ledger = ledger().await;
        let id = ledger
            .create(fields("Aspirin", 2, 100), "ph1")
            .await
            .unwrap();

        let err = ledger.deduct(&id, 0, "c1").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(CoreError::Validation(_))
        ));
    }
}
