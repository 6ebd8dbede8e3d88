//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// Store operations that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    UpdateReceivable,
    DeleteReceivable,
    CreateTransaction,
    DeleteTransaction,
}

/// In-memory storage implementing both stores, for testing and development
///
/// Clones share the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    receivables: Arc<RwLock<HashMap<String, ReceivableAccount>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    failures: Arc<RwLock<HashMap<StoreOperation, usize>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `times` calls of `operation` fail with a persistence error
    pub fn fail_next(&self, operation: StoreOperation, times: usize) -> FinanceResult<()> {
        write(&self.failures)?.insert(operation, times);
        Ok(())
    }

    fn check_failure(&self, operation: StoreOperation) -> FinanceResult<()> {
        let mut failures = write(&self.failures)?;
        match failures.get_mut(&operation) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(FinanceError::Persistence(format!(
                    "injected failure on {:?}",
                    operation
                )))
            }
            _ => Ok(()),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> FinanceResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| FinanceError::Persistence("storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> FinanceResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| FinanceError::Persistence("storage lock poisoned".to_string()))
}

#[async_trait]
impl ReceivableStore for MemoryStorage {
    async fn save_receivable(&mut self, receivable: &ReceivableAccount) -> FinanceResult<()> {
        write(&self.receivables)?.insert(receivable.id.clone(), receivable.clone());
        Ok(())
    }

    async fn get_receivable(
        &self,
        receivable_id: &str,
    ) -> FinanceResult<Option<ReceivableAccount>> {
        Ok(read(&self.receivables)?.get(receivable_id).cloned())
    }

    async fn list_receivables(&self) -> FinanceResult<Vec<ReceivableAccount>> {
        let mut receivables: Vec<ReceivableAccount> =
            read(&self.receivables)?.values().cloned().collect();
        receivables.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
        Ok(receivables)
    }

    async fn update_receivable(
        &mut self,
        receivable_id: &str,
        patch: &ReceivablePatch,
    ) -> FinanceResult<ReceivableAccount> {
        self.check_failure(StoreOperation::UpdateReceivable)?;
        let mut receivables = write(&self.receivables)?;
        let receivable = receivables
            .get_mut(receivable_id)
            .ok_or_else(|| FinanceError::ReceivableNotFound(receivable_id.to_string()))?;
        receivable.apply_patch(patch);
        Ok(receivable.clone())
    }

    async fn delete_receivable(&mut self, receivable_id: &str) -> FinanceResult<()> {
        self.check_failure(StoreOperation::DeleteReceivable)?;
        if write(&self.receivables)?.remove(receivable_id).is_some() {
            Ok(())
        } else {
            Err(FinanceError::ReceivableNotFound(receivable_id.to_string()))
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStorage {
    async fn create_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> FinanceResult<Transaction> {
        self.check_failure(StoreOperation::CreateTransaction)?;
        let stored = Transaction::from_new(uuid::Uuid::new_v4().to_string(), transaction);
        write(&self.transactions)?.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_transaction(&self, transaction_id: &str) -> FinanceResult<Option<Transaction>> {
        Ok(read(&self.transactions)?.get(transaction_id).cloned())
    }

    async fn list_transactions(&self) -> FinanceResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> =
            read(&self.transactions)?.values().cloned().collect();
        transactions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()> {
        let mut transactions = write(&self.transactions)?;
        match transactions.get_mut(&transaction.id) {
            Some(stored) => {
                *stored = transaction.clone();
                Ok(())
            }
            None => Err(FinanceError::TransactionNotFound(transaction.id.clone())),
        }
    }

    async fn delete_transaction(&mut self, transaction_id: &str) -> FinanceResult<()> {
        self.check_failure(StoreOperation::DeleteTransaction)?;
        if write(&self.transactions)?.remove(transaction_id).is_some() {
            Ok(())
        } else {
            Err(FinanceError::TransactionNotFound(transaction_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, Utc};

    fn receivable(id: &str) -> ReceivableAccount {
        ReceivableAccount::new(
            id.to_string(),
            "c1".to_string(),
            "cat1".to_string(),
            BigDecimal::from(100),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_clones_share_collections() {
        let mut storage = MemoryStorage::new();
        let other = storage.clone();

        storage.save_receivable(&receivable("r1")).await.unwrap();

        assert!(other.get_receivable("r1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_receivable() {
        let mut storage = MemoryStorage::new();
        let result = storage
            .update_receivable("nope", &ReceivablePatch::unreceived())
            .await;
        assert!(matches!(result, Err(FinanceError::ReceivableNotFound(_))));
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed() {
        let mut storage = MemoryStorage::new();
        storage.fail_next(StoreOperation::CreateTransaction, 1).unwrap();
        let new = NewTransaction::for_receivable(&receivable("r1"), Utc::now());

        let first = storage.create_transaction(&new).await;
        assert!(matches!(first, Err(FinanceError::Persistence(_))));

        let second = storage.create_transaction(&new).await.unwrap();
        assert!(!second.id.is_empty());
        assert_eq!(storage.list_transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_source() {
        let mut storage = MemoryStorage::new();
        let new = NewTransaction::for_receivable(&receivable("r1"), Utc::now());
        storage.create_transaction(&new).await.unwrap();

        let linked = storage
            .find_by_source(SourceType::Receivable, "r1")
            .await
            .unwrap();
        assert_eq!(linked.len(), 1);
        assert!(storage
            .find_by_source(SourceType::Payable, "r1")
            .await
            .unwrap()
            .is_empty());
    }
}
