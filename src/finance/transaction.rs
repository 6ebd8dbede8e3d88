//! Ledger transaction management

use tracing::debug;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{
    validate_new_transaction, validate_non_negative_amount, validate_source,
};

/// Manager for manually entered ledger transactions
///
/// Transactions generated from receivables belong to the reconciliation
/// engine: they cannot be created or deleted here, and their amount, date
/// and provenance cannot be edited.
pub struct TransactionManager<S: LedgerStore> {
    storage: S,
}

impl<S: LedgerStore> TransactionManager<S> {
    /// Create a new transaction manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Record a new transaction
    pub async fn record_transaction(
        &mut self,
        transaction: NewTransaction,
    ) -> FinanceResult<Transaction> {
        validate_new_transaction(&transaction)?;
        if transaction.source_type == SourceType::Receivable {
            return Err(FinanceError::Validation(
                "Receivable transactions are created by marking the receivable received"
                    .to_string(),
            ));
        }

        let created = self.storage.create_transaction(&transaction).await?;
        debug!(transaction_id = %created.id, "transaction recorded");
        Ok(created)
    }

    /// Get a transaction by ID
    pub async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> FinanceResult<Option<Transaction>> {
        self.storage.get_transaction(transaction_id).await
    }

    /// Get a transaction by ID, returning an error if not found
    pub async fn get_transaction_required(
        &self,
        transaction_id: &str,
    ) -> FinanceResult<Transaction> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| FinanceError::TransactionNotFound(transaction_id.to_string()))
    }

    /// List all transactions
    pub async fn list_transactions(&self) -> FinanceResult<Vec<Transaction>> {
        self.storage.list_transactions().await
    }

    /// Transactions generated from a receivable
    pub async fn linked_to(&self, receivable_id: &str) -> FinanceResult<Vec<Transaction>> {
        self.storage
            .find_by_source(SourceType::Receivable, receivable_id)
            .await
    }

    /// Update a transaction
    pub async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()> {
        let existing = self.get_transaction_required(&transaction.id).await?;

        validate_non_negative_amount(&transaction.value)?;
        validate_source(transaction.source_type, transaction.source_id.as_deref())?;

        let generated = existing.source_type == SourceType::Receivable
            || transaction.source_type == SourceType::Receivable;
        if generated
            && (existing.source_type != transaction.source_type
                || existing.source_id != transaction.source_id
                || existing.transaction_type != transaction.transaction_type
                || existing.value != transaction.value
                || existing.payment_date != transaction.payment_date)
        {
            return Err(FinanceError::Validation(format!(
                "Transaction '{}' mirrors a receivable; edit the receivable instead",
                transaction.id
            )));
        }

        let mut updated = transaction.clone();
        updated.created_at = existing.created_at;
        updated.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_transaction(&updated).await
    }

    /// Delete a transaction
    pub async fn delete_transaction(&mut self, transaction_id: &str) -> FinanceResult<()> {
        let existing = self.get_transaction_required(transaction_id).await?;
        if existing.source_type == SourceType::Receivable {
            return Err(FinanceError::Validation(format!(
                "Transaction '{}' is removed by marking its receivable not received",
                transaction_id
            )));
        }
        self.storage.delete_transaction(transaction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, Utc};

    fn manual() -> NewTransaction {
        NewTransaction::manual(
            TransactionType::Expense,
            "s1".to_string(),
            "cat2".to_string(),
            BigDecimal::from(40),
            Utc::now(),
        )
    }

    fn generated() -> NewTransaction {
        let receivable = ReceivableAccount::new(
            "r1".to_string(),
            "c1".to_string(),
            "cat1".to_string(),
            BigDecimal::from(100),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        NewTransaction::for_receivable(&receivable, Utc::now())
    }

    #[tokio::test]
    async fn test_record_and_edit_manual_transaction() {
        let mut manager = TransactionManager::new(MemoryStorage::new());
        let mut created = manager.record_transaction(manual()).await.unwrap();

        created.value = BigDecimal::from(45);
        manager.update_transaction(&created).await.unwrap();

        let stored = manager.get_transaction_required(&created.id).await.unwrap();
        assert_eq!(stored.value, BigDecimal::from(45));

        manager.delete_transaction(&created.id).await.unwrap();
        assert!(manager.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cannot_record_receivable_transaction_by_hand() {
        let mut manager = TransactionManager::new(MemoryStorage::new());
        let result = manager.record_transaction(generated()).await;
        assert!(matches!(result, Err(FinanceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_generated_transaction_is_protected() {
        let mut storage = MemoryStorage::new();
        let created = storage.create_transaction(&generated()).await.unwrap();
        let mut manager = TransactionManager::new(storage);

        let mut edited = created.clone();
        edited.value = BigDecimal::from(1);
        assert!(manager.update_transaction(&edited).await.is_err());

        let mut annotated = created.clone();
        annotated.observations = Some("paid by wire".to_string());
        manager.update_transaction(&annotated).await.unwrap();

        assert!(manager.delete_transaction(&created.id).await.is_err());
        assert_eq!(manager.linked_to("r1").await.unwrap().len(), 1);
    }
}
