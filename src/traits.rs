//! Traits for storage abstraction and time

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::*;

/// Storage abstraction for receivable accounts
///
/// The finance core never assumes exclusive access to the store: other
/// callers may write between two reads, so results are always treated as
/// snapshots.
#[async_trait]
pub trait ReceivableStore: Send + Sync {
    /// Save a new receivable
    async fn save_receivable(&mut self, receivable: &ReceivableAccount) -> FinanceResult<()>;

    /// Get a receivable by ID
    async fn get_receivable(&self, receivable_id: &str) -> FinanceResult<Option<ReceivableAccount>>;

    /// List all receivables
    async fn list_receivables(&self) -> FinanceResult<Vec<ReceivableAccount>>;

    /// Apply a partial update and return the stored result
    async fn update_receivable(
        &mut self,
        receivable_id: &str,
        patch: &ReceivablePatch,
    ) -> FinanceResult<ReceivableAccount>;

    /// Delete a receivable
    async fn delete_receivable(&mut self, receivable_id: &str) -> FinanceResult<()>;
}

/// Storage abstraction for ledger transactions
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create a transaction; the store assigns its id
    async fn create_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> FinanceResult<Transaction>;

    /// Get a transaction by ID
    async fn get_transaction(&self, transaction_id: &str) -> FinanceResult<Option<Transaction>>;

    /// List all transactions
    async fn list_transactions(&self) -> FinanceResult<Vec<Transaction>>;

    /// Transactions generated from the given source record
    async fn find_by_source(
        &self,
        source_type: SourceType,
        source_id: &str,
    ) -> FinanceResult<Vec<Transaction>> {
        Ok(self
            .list_transactions()
            .await?
            .into_iter()
            .filter(|t| t.source_type == source_type && t.source_id.as_deref() == Some(source_id))
            .collect())
    }

    /// Replace a stored transaction
    async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()>;

    /// Delete a transaction
    async fn delete_transaction(&mut self, transaction_id: &str) -> FinanceResult<()>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in UTC
    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
