//! # Medicine Repository
//!
//! Database operations for the stock ledger.
//!
//! ## The Deduction Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Deduction Strategy                         │
//! │                                                                     │
//! │  ❌ WRONG: blind decrement from a stale read (lost update)          │
//! │     read qty=5 ... UPDATE medicines SET quantity = 5 - 3            │
//! │     A racing cashier's deduction in between is silently overwritten │
//! │     and the shelf is oversold.                                      │
//! │                                                                     │
//! │  ✅ CORRECT: conditional atomic decrement                           │
//! │     UPDATE medicines SET quantity = quantity - 3                    │
//! │     WHERE id = ? AND quantity >= 3                                  │
//! │                                                                     │
//! │  Whichever commit lands second re-reads current state via the       │
//! │  WHERE clause; if stock no longer suffices, zero rows change and    │
//! │  the caller gets Insufficient{available} instead of an oversell.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use medipos_core::{MedicineRecord, MedicineUpdate, NewMedicine};

/// Outcome of a conditional stock deduction.
///
/// Deduction is the one mutation where "row unchanged" is ambiguous, so
/// the repository disambiguates by re-reading and reports which case
/// occurred instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductOutcome {
    /// Stock was decremented.
    Applied,
    /// The medicine no longer exists (hard deleted).
    NotFound,
    /// Stock was below the requested quantity at decrement time.
    Insufficient { available: i64 },
}

/// Repository for medicine database operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Lists all medicines ordered by name.
    ///
    /// This is the full-snapshot read backing both the live feed and
    /// commit-time re-validation.
    pub async fn list(&self) -> StoreResult<Vec<MedicineRecord>> {
        let medicines = sqlx::query_as::<_, MedicineRecord>(
            r#"
            SELECT id, name, quantity, price_cents, expiry_date, last_updated, updated_by
            FROM medicines
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(medicines)
    }

    /// Gets a medicine by its ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<MedicineRecord>> {
        let medicine = sqlx::query_as::<_, MedicineRecord>(
            r#"
            SELECT id, name, quantity, price_cents, expiry_date, last_updated, updated_by
            FROM medicines
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Inserts a new medicine and returns its generated id.
    ///
    /// Fields are assumed validated by the caller (the ledger service);
    /// the CHECK constraints still backstop the numeric invariants.
    pub async fn insert(&self, fields: &NewMedicine, actor_id: &str) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %fields.name, "Inserting medicine");

        sqlx::query(
            r#"
            INSERT INTO medicines (id, name, quantity, price_cents, expiry_date, last_updated, updated_by)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(fields.name.trim())
        .bind(fields.quantity)
        .bind(fields.price_cents)
        .bind(fields.expiry_date)
        .bind(now)
        .bind(actor_id)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Replaces the editable field set of a medicine.
    ///
    /// Returns the number of affected rows (0 when the id is absent); the
    /// ledger service maps that to a domain not-found error.
    pub async fn update(
        &self,
        id: &str,
        fields: &MedicineUpdate,
        actor_id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Updating medicine");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medicines SET
                name = ?2,
                quantity = ?3,
                price_cents = ?4,
                expiry_date = ?5,
                last_updated = ?6,
                updated_by = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.name.trim())
        .bind(fields.quantity)
        .bind(fields.price_cents)
        .bind(fields.expiry_date)
        .bind(now)
        .bind(actor_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Hard-deletes a medicine. Returns affected rows (0 when absent).
    ///
    /// No tombstone: sale lines keep their own frozen copies, so history
    /// survives the delete.
    pub async fn delete(&self, id: &str) -> StoreResult<u64> {
        debug!(id = %id, "Deleting medicine");

        let result = sqlx::query("DELETE FROM medicines WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Conditionally deducts stock, stamping the audit fields.
    ///
    /// The decrement only applies while `quantity >= qty` still holds at
    /// execution time. On a no-op the current row is re-read to tell a
    /// vanished medicine apart from an insufficient one.
    pub async fn deduct(&self, id: &str, qty: i64, actor_id: &str) -> StoreResult<DeductOutcome> {
        debug!(id = %id, qty = %qty, "Deducting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medicines SET
                quantity = quantity - ?2,
                last_updated = ?3,
                updated_by = ?4
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(qty)
        .bind(now)
        .bind(actor_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(DeductOutcome::Applied);
        }

        // Zero rows: either the id is gone or stock no longer suffices.
        match self.get_by_id(id).await? {
            None => Ok(DeductOutcome::NotFound),
            Some(current) => Ok(DeductOutcome::Insufficient {
                available: current.quantity,
            }),
        }
    }

    /// Counts medicines (for diagnostics and the seed tool).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    async fn repo() -> MedicineRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.medicines()
    }

    fn paracetamol() -> NewMedicine {
        NewMedicine {
            name: "Paracetamol".to_string(),
            quantity: 20,
            price_cents: 150,
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 31),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;

        let id = repo.insert(&paracetamol(), "ph1").await.unwrap();
        let medicine = repo.get_by_id(&id).await.unwrap().unwrap();

        assert_eq!(medicine.name, "Paracetamol");
        assert_eq!(medicine.quantity, 20);
        assert_eq!(medicine.price_cents, 150);
        assert_eq!(
            medicine.expiry_date,
            NaiveDate::from_ymd_opt(2027, 1, 31)
        );
        assert_eq!(medicine.updated_by, "ph1");
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let repo = repo().await;

        for name in ["Zinc Sulphate", "Aspirin", "Metformin"] {
            let fields = NewMedicine {
                name: name.to_string(),
                quantity: 5,
                price_cents: 100,
                expiry_date: None,
            };
            repo.insert(&fields, "ph1").await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Aspirin", "Metformin", "Zinc Sulphate"]);
    }

    #[tokio::test]
    async fn test_deduct_applies_and_stamps_actor() {
        let repo = repo().await;
        let id = repo.insert(&paracetamol(), "ph1").await.unwrap();

        let outcome = repo.deduct(&id, 3, "cashier-2").await.unwrap();
        assert_eq!(outcome, DeductOutcome::Applied);

        let medicine = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(medicine.quantity, 17);
        assert_eq!(medicine.updated_by, "cashier-2");
    }

    #[tokio::test]
    async fn test_deduct_insufficient_reports_available() {
        let repo = repo().await;
        let id = repo.insert(&paracetamol(), "ph1").await.unwrap();

        let outcome = repo.deduct(&id, 25, "c1").await.unwrap();
        assert_eq!(outcome, DeductOutcome::Insufficient { available: 20 });

        // Stock untouched by the failed attempt.
        let medicine = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(medicine.quantity, 20);
    }

    #[tokio::test]
    async fn test_deduct_sequenced_never_oversells() {
        // Stock 5, two deductions of 3: the second must lose, stock must
        // never go negative.
        let repo = repo().await;
        let fields = NewMedicine {
            quantity: 5,
            ..paracetamol()
        };
        let id = repo.insert(&fields, "ph1").await.unwrap();

        let first = repo.deduct(&id, 3, "c1").await.unwrap();
        let second = repo.deduct(&id, 3, "c2").await.unwrap();

        assert_eq!(first, DeductOutcome::Applied);
        assert_eq!(second, DeductOutcome::Insufficient { available: 2 });
        assert_eq!(repo.get_by_id(&id).await.unwrap().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_deduct_missing_medicine() {
        let repo = repo().await;
        let outcome = repo.deduct("ghost", 1, "c1").await.unwrap();
        assert_eq!(outcome, DeductOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let repo = repo().await;
        let id = repo.insert(&paracetamol(), "ph1").await.unwrap();

        assert_eq!(repo.delete(&id).await.unwrap(), 1);
        assert!(repo.get_by_id(&id).await.unwrap().is_none());
        // Second delete affects nothing.
        assert_eq!(repo.delete(&id).await.unwrap(), 0);
    }
}
