//! Derived views over receivables and transactions

pub mod status;
pub mod summary;

pub use status::*;
pub use summary::*;
