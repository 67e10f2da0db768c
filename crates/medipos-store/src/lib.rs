//! # medipos-store: Storage Layer for MediPOS
//!
//! Persistence and orchestration for the pharmacy inventory/sale engine.
//! SQLite via sqlx for local storage, tokio watch channels for the live
//! snapshot feeds.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       MediPOS Data Flow                             │
//! │                                                                     │
//! │   StockLedger ──live feed──► Alert evaluation (medipos-core)        │
//! │       │       ──live feed──► Cart validation  (medipos-core)        │
//! │       │                            │                                │
//! │       │                            ▼ checkout                       │
//! │       │                      SaleCommitter                          │
//! │       │                       │        │                            │
//! │       │◄──── deductions ──────┘        └── append ──► SalesJournal  │
//! │       │                                                  │          │
//! │       └───────────── both feeds refresh ─────────────────┘          │
//! │                                                                     │
//! │  The loop closes: every mutation republishes a full snapshot and    │
//! │  consumers re-derive their state from it.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store, ledger and commit error types
//! - [`feed`] - Push-based snapshot feed with subscription handles
//! - [`repository`] - Raw SQL repositories (medicines, sales)
//! - [`ledger`] - Stock ledger service (mutations + feed publication)
//! - [`journal`] - Append-only sales journal service
//! - [`checkout`] - Sale commit: re-validate, append, deduct
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medipos_store::{Database, DbConfig, SaleCommitter, SalesJournal, StockLedger};
//!
//! let db = Database::new(DbConfig::new("pharmacy.db")).await?;
//! let ledger = StockLedger::new(&db).await?;
//! let journal = SalesJournal::new(&db).await?;
//! let committer = SaleCommitter::new(ledger.clone(), journal.clone());
//!
//! let mut cart = medipos_core::Cart::new();
//! cart.add_line(&ledger.snapshot().await?, &medicine_id)?;
//! let sale_id = committer.commit(&mut cart, "cashier-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod feed;
pub mod journal;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::SaleCommitter;
pub use error::{CommitError, DeductionFailure, LedgerError, StoreError};
pub use feed::{Feed, Subscription};
pub use journal::SalesJournal;
pub use ledger::StockLedger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::medicine::MedicineRepository;
pub use repository::sale::SaleRepository;
