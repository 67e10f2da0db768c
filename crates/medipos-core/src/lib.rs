//! # medipos-core: Pure Business Logic for MediPOS
//!
//! This crate is the heart of the pharmacy inventory/sale consistency
//! engine. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       MediPOS Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │               ★ medipos-core (THIS CRATE) ★                 │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────┐ │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │ alerts  │ │ valid │ │   │
//! │  │  │ Medicine│ │  Money  │ │  Cart   │ │ low/exp │ │ rules │ │   │
//! │  │  │  Sale   │ │  cents  │ │CartLine │ │  sets   │ │ checks│ │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └───────┘ │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                medipos-store (Storage Layer)                │   │
//! │  │      Stock ledger, sales journal, live feeds, checkout      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MedicineRecord, SaleRecord, StockSnapshot)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`cart`] - Per-session cart validated against stock snapshots
//! - [`alerts`] - Pure low-stock / expiring-soon evaluation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: persistence and feeds live in medipos-store
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// A medicine with quantity at or below this threshold is low on stock.
///
/// The threshold is inclusive: a quantity of exactly 10 (or 0) counts.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Calendar-day window for the expiring-soon alert.
///
/// The check uses the absolute day distance from today, so medicines past
/// their expiry date still land in the expiring-soon set. That is the
/// historical behavior of the alert and is preserved deliberately; there is
/// no separate "expired" state.
pub const EXPIRY_WINDOW_DAYS: i64 = 60;
