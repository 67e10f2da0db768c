//! # Repository Module
//!
//! Raw SQL repositories for MediPOS. The Repository pattern keeps SQL in
//! one place behind a clean async API; the ledger/journal services layer
//! feed publication and domain mapping on top.
//!
//! ## Available Repositories
//!
//! - [`medicine::MedicineRepository`] - stock ledger rows, conditional deductions
//! - [`sale::SaleRepository`] - append-only sale rows and frozen line snapshots

pub mod medicine;
pub mod sale;
