//! Main tracker orchestrator that coordinates receivables, transactions and
//! reconciliation

use std::sync::Arc;

use crate::config::FinanceConfig;
use crate::directory::Directory;
use crate::finance::{ReceivableManager, TransactionManager};
use crate::reconciliation::*;
use crate::reports::*;
use crate::traits::*;
use crate::types::*;

/// Finance tracker over a single backend that stores both receivables and
/// transactions
pub struct FinanceTracker<S: ReceivableStore + LedgerStore> {
    config: FinanceConfig,
    clock: Arc<dyn Clock>,
    directory: Directory,
    receivables: ReceivableManager<S>,
    transactions: TransactionManager<S>,
    engine: ReconciliationEngine<S, S>,
}

impl<S: ReceivableStore + LedgerStore + Clone> FinanceTracker<S> {
    /// Create a new tracker with default configuration and the system clock
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, FinanceConfig::default(), Arc::new(SystemClock))
    }

    /// Create a new tracker with custom configuration and clock
    pub fn with_config(storage: S, config: FinanceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock: clock.clone(),
            directory: Directory::default(),
            receivables: ReceivableManager::new(storage.clone()),
            transactions: TransactionManager::new(storage.clone()),
            engine: ReconciliationEngine::with_clock(storage.clone(), storage, clock),
        }
    }

    /// Replace the client/supplier and category directory
    pub fn with_directory(mut self, directory: Directory) -> Self {
        self.directory = directory;
        self
    }

    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    // Receivable operations
    /// Create a new receivable
    pub async fn create_receivable(
        &mut self,
        receivable: ReceivableAccount,
    ) -> FinanceResult<ReceivableAccount> {
        self.receivables.create_receivable(receivable).await
    }

    /// Get a receivable by ID
    pub async fn get_receivable(
        &self,
        receivable_id: &str,
    ) -> FinanceResult<Option<ReceivableAccount>> {
        self.receivables.get_receivable(receivable_id).await
    }

    /// List all receivables
    pub async fn list_receivables(&self) -> FinanceResult<Vec<ReceivableAccount>> {
        self.receivables.list_receivables().await
    }

    /// Edit a receivable's details
    pub async fn update_receivable(
        &mut self,
        receivable_id: &str,
        patch: &ReceivablePatch,
    ) -> FinanceResult<ReceivableAccount> {
        self.receivables.update_receivable(receivable_id, patch).await
    }

    /// Delete a receivable once `confirm` agrees
    pub async fn delete_receivable<F>(
        &mut self,
        receivable_id: &str,
        confirm: F,
    ) -> FinanceResult<bool>
    where
        F: FnOnce(&str) -> bool + Send,
    {
        self.engine.delete_receivable(receivable_id, confirm).await
    }

    // Reconciliation operations
    /// Mark a receivable received, creating its revenue transaction if needed
    pub async fn mark_received(&mut self, receivable_id: &str) -> FinanceResult<ReceiptOutcome> {
        let receivable = self.receivables.get_receivable_required(receivable_id).await?;
        let snapshot = self.engine.ledger_snapshot().await?;
        self.engine.mark_received(&receivable, &snapshot).await
    }

    /// Mark a receivable not received, removing its revenue transaction
    pub async fn mark_unreceived(&mut self, receivable_id: &str) -> FinanceResult<ReversalOutcome> {
        let receivable = self.receivables.get_receivable_required(receivable_id).await?;
        let snapshot = self.engine.ledger_snapshot().await?;
        self.engine.mark_unreceived(&receivable, &snapshot).await
    }

    /// Repair the ledger side of a receivable after a failed operation
    pub async fn resync(&mut self, receivable_id: &str) -> FinanceResult<ResyncOutcome> {
        let receivable = self.receivables.get_receivable_required(receivable_id).await?;
        let snapshot = self.engine.ledger_snapshot().await?;
        self.engine.resync(&receivable, &snapshot).await
    }

    /// Check every receivable against the ledger
    pub async fn audit(&self) -> FinanceResult<ReconciliationReport> {
        let receivables = self.receivables.list_receivables().await?;
        let transactions = self.transactions.list_transactions().await?;
        Ok(audit(&receivables, &transactions))
    }

    // Transaction operations
    /// Record a manual transaction
    pub async fn record_transaction(
        &mut self,
        transaction: NewTransaction,
    ) -> FinanceResult<Transaction> {
        self.transactions.record_transaction(transaction).await
    }

    /// Get a transaction by ID
    pub async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> FinanceResult<Option<Transaction>> {
        self.transactions.get_transaction(transaction_id).await
    }

    /// List all transactions
    pub async fn list_transactions(&self) -> FinanceResult<Vec<Transaction>> {
        self.transactions.list_transactions().await
    }

    /// Transactions generated from a receivable
    pub async fn linked_transactions(
        &self,
        receivable_id: &str,
    ) -> FinanceResult<Vec<Transaction>> {
        self.transactions.linked_to(receivable_id).await
    }

    /// Update a transaction
    pub async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()> {
        self.transactions.update_transaction(transaction).await
    }

    /// Delete a manual transaction
    pub async fn delete_transaction(&mut self, transaction_id: &str) -> FinanceResult<()> {
        self.transactions.delete_transaction(transaction_id).await
    }

    // Reporting operations
    /// Display status of a receivable as of today
    pub fn status_of(&self, receivable: &ReceivableAccount) -> ReceivableStatus {
        receivable.status(self.clock.today(), self.config.due_soon_days)
    }

    /// Display status of a stored receivable as of today
    pub async fn receivable_status(&self, receivable_id: &str) -> FinanceResult<ReceivableStatus> {
        let receivable = self.receivables.get_receivable_required(receivable_id).await?;
        Ok(self.status_of(&receivable))
    }

    /// Receivables grouped by status as of today
    pub async fn receivable_summary(&self) -> FinanceResult<ReceivableSummary> {
        let receivables = self.receivables.list_receivables().await?;
        Ok(ReceivableSummary::from_receivables(
            &receivables,
            self.clock.today(),
            self.config.due_soon_days,
        ))
    }

    /// Transactions matching `filter`, newest first
    pub async fn filtered_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> FinanceResult<Vec<Transaction>> {
        let transactions = self.transactions.list_transactions().await?;
        Ok(filter_transactions(
            &transactions,
            filter,
            &self.directory,
            self.config.search_observations,
        ))
    }

    /// Totals over the transactions matching `filter`
    pub async fn financial_summary(
        &self,
        filter: &TransactionFilter,
    ) -> FinanceResult<FinancialSummary> {
        let filtered = self.filtered_transactions(filter).await?;
        Ok(FinancialSummary::from_transactions(&filtered))
    }

    /// Per-category totals over the transactions matching `filter`
    pub async fn category_summary(
        &self,
        filter: &TransactionFilter,
    ) -> FinanceResult<Vec<CategorySummary>> {
        let filtered = self.filtered_transactions(filter).await?;
        Ok(category_summary(&filtered, &self.directory))
    }
}
