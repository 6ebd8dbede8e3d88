//! Reconciliation between receivable status and the ledger
//!
//! A receivable owns at most one generated revenue transaction, tagged with
//! `SourceType::Receivable` and the receivable's id. The engine creates it
//! when the receivable is received and deletes it when that is undone; the
//! audit reports any drift between the two collections.

pub mod audit;
pub mod engine;

pub use audit::*;
pub use engine::*;
