//! Finance module containing receivable management, transaction processing
//! and the tracker that ties them to reconciliation

pub mod core;
pub mod receivable;
pub mod transaction;

pub use self::core::*;
pub use receivable::*;
pub use transaction::*;
