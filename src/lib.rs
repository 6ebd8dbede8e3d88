//! # Finance Core
//!
//! Receivable accounts, ledger transactions and the reconciliation that keeps
//! them in step, for a small personal or business finance tracker.
//!
//! ## Features
//!
//! - **Reconciliation**: marking a receivable received creates exactly one
//!   revenue transaction tagged with the receivable's id; unmarking deletes it
//! - **Audit**: detects missing, duplicate, orphaned or mismatched linked transactions
//! - **Reports**: receivable status badges, transaction filters, totals and
//!   per-category summaries
//! - **Storage abstraction**: any backend implementing [`ReceivableStore`] and [`LedgerStore`]
//!
//! ## Quick Start
//!
//! ```rust
//! use finance_core::{FinanceTracker, ReceivableAccount, utils::MemoryStorage};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # async fn run() -> finance_core::FinanceResult<()> {
//! let mut tracker = FinanceTracker::new(MemoryStorage::new());
//! tracker
//!     .create_receivable(ReceivableAccount::new(
//!         "r1".to_string(),
//!         "c1".to_string(),
//!         "cat1".to_string(),
//!         BigDecimal::from(150),
//!         NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!     ))
//!     .await?;
//! tracker.mark_received("r1").await?;
//! assert_eq!(tracker.linked_transactions("r1").await?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod finance;
pub mod logging;
pub mod reconciliation;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use directory::*;
pub use finance::*;
pub use reconciliation::*;
pub use reports::*;
pub use traits::*;
pub use types::*;
