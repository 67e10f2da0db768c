//! # Sale Repository
//!
//! Database operations for the append-only sales journal.
//!
//! A sale and its line snapshots are written together in one transaction:
//! the journal record is a single logical unit and must never be readable
//! half-written. There are deliberately no UPDATE or DELETE statements in
//! this file.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use medipos_core::{SaleLine, SaleRecord};

/// Row shape of the `sales` table; lines are attached separately.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
    cashier_id: String,
}

/// Repository for sale journal operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale record with its frozen line snapshots.
    ///
    /// Sale row and line rows commit atomically (per-record atomicity);
    /// stock deductions are NOT part of this transaction - that is the
    /// checkout layer's contract.
    pub async fn insert(&self, sale: &SaleRecord) -> StoreResult<()> {
        debug!(id = %sale.id, total = %sale.total_cents, lines = sale.lines.len(), "Appending sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, created_at, cashier_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .bind(&sale.cashier_id)
        .execute(&mut *tx)
        .await?;

        for (position, line) in sale.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (id, sale_id, position, medicine_id, name, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(position as i64)
            .bind(&line.medicine_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Lists all sales newest-first, lines attached in order.
    pub async fn list(&self) -> StoreResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, total_cents, created_at, cashier_id
            FROM sales
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.lines_for(&row.id).await?;
            sales.push(SaleRecord {
                id: row.id,
                lines,
                total_cents: row.total_cents,
                created_at: row.created_at,
                cashier_id: row.cashier_id,
            });
        }

        Ok(sales)
    }

    /// Gets a single sale with its lines.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<SaleRecord>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, total_cents, created_at, cashier_id
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let lines = self.lines_for(&row.id).await?;
                Ok(Some(SaleRecord {
                    id: row.id,
                    lines,
                    total_cents: row.total_cents,
                    created_at: row.created_at,
                    cashier_id: row.cashier_id,
                }))
            }
        }
    }

    async fn lines_for(&self, sale_id: &str) -> StoreResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT medicine_id, name, quantity, unit_price_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn repo() -> SaleRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.sales()
    }

    fn sale(id: &str, created_at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id: id.to_string(),
            lines: vec![
                SaleLine {
                    medicine_id: "m1".to_string(),
                    name: "Paracetamol".to_string(),
                    quantity: 3,
                    unit_price_cents: 150,
                },
                SaleLine {
                    medicine_id: "m2".to_string(),
                    name: "Aspirin".to_string(),
                    quantity: 1,
                    unit_price_cents: 100,
                },
            ],
            total_cents: 550,
            created_at,
            cashier_id: "c1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trips_lines_in_order() {
        let repo = repo().await;
        let record = sale("s1", Utc::now());

        repo.insert(&record).await.unwrap();
        let fetched = repo.get_by_id("s1").await.unwrap().unwrap();

        assert_eq!(fetched.total_cents, 550);
        assert_eq!(fetched.cashier_id, "c1");
        assert_eq!(fetched.lines.len(), 2);
        assert_eq!(fetched.lines[0].name, "Paracetamol");
        assert_eq!(fetched.lines[1].name, "Aspirin");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = repo().await;
        let base = Utc::now();

        repo.insert(&sale("old", base - Duration::minutes(10)))
            .await
            .unwrap();
        repo.insert(&sale("new", base)).await.unwrap();
        repo.insert(&sale("mid", base - Duration::minutes(5)))
            .await
            .unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let repo = repo().await;
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }
}
