//! # Sales Journal Service
//!
//! Append-only sale history with a live feed of the full listing.
//!
//! The journal never updates or deletes: a sale that has been appended is
//! permanent, even when its stock deductions later turn out incomplete.
//! Reconciliation happens by appending, not by rewriting history.

use tracing::info;

use crate::error::StoreResult;
use crate::feed::{Feed, Subscription};
use crate::pool::Database;
use crate::repository::sale::SaleRepository;
use medipos_core::SaleRecord;

/// The sales journal: repository plus live listing feed.
#[derive(Debug, Clone)]
pub struct SalesJournal {
    repo: SaleRepository,
    feed: Feed<Vec<SaleRecord>>,
}

impl SalesJournal {
    /// Creates a journal over the given database, seeding the feed with
    /// the current history (newest first).
    pub async fn new(db: &Database) -> StoreResult<Self> {
        let repo = db.sales();
        let initial = repo.list().await?;
        Ok(SalesJournal {
            repo,
            feed: Feed::new(initial),
        })
    }

    /// Subscribes to the live sale-history feed.
    pub fn subscribe(&self) -> Subscription<Vec<SaleRecord>> {
        self.feed.subscribe()
    }

    /// Appends a sale record and returns its id.
    ///
    /// The record and its line snapshots land atomically; the refreshed
    /// listing is published afterwards.
    pub async fn append(&self, sale: &SaleRecord) -> StoreResult<String> {
        self.repo.insert(sale).await?;
        info!(id = %sale.id, total_cents = %sale.total_cents, "Sale journaled");

        let listing = self.repo.list().await?;
        self.feed.publish(listing);
        Ok(sale.id.clone())
    }

    /// Lists all sales newest-first.
    pub async fn list(&self) -> StoreResult<Vec<SaleRecord>> {
        self.repo.list().await
    }

    /// Gets a single journaled sale.
    pub async fn get(&self, id: &str) -> StoreResult<Option<SaleRecord>> {
        self.repo.get_by_id(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
