//! Receivable account management

use tracing::debug;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_receivable;

/// Manager for creating, reading and editing receivables
///
/// Received status is not editable here. It has ledger side effects and
/// goes through the reconciliation engine.
pub struct ReceivableManager<S: ReceivableStore> {
    storage: S,
}

impl<S: ReceivableStore> ReceivableManager<S> {
    /// Create a new receivable manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new receivable. New receivables start out not received.
    pub async fn create_receivable(
        &mut self,
        receivable: ReceivableAccount,
    ) -> FinanceResult<ReceivableAccount> {
        validate_receivable(&receivable)?;

        if receivable.is_received || receivable.received_date.is_some() {
            return Err(FinanceError::Validation(format!(
                "Receivable '{}' must be created as not received; mark it received afterwards",
                receivable.id
            )));
        }

        if self.storage.get_receivable(&receivable.id).await?.is_some() {
            return Err(FinanceError::Validation(format!(
                "Receivable with ID '{}' already exists",
                receivable.id
            )));
        }

        self.storage.save_receivable(&receivable).await?;
        debug!(receivable_id = %receivable.id, "receivable created");
        Ok(receivable)
    }

    /// Get a receivable by ID
    pub async fn get_receivable(
        &self,
        receivable_id: &str,
    ) -> FinanceResult<Option<ReceivableAccount>> {
        self.storage.get_receivable(receivable_id).await
    }

    /// Get a receivable by ID, returning an error if not found
    pub async fn get_receivable_required(
        &self,
        receivable_id: &str,
    ) -> FinanceResult<ReceivableAccount> {
        self.storage
            .get_receivable(receivable_id)
            .await?
            .ok_or_else(|| FinanceError::ReceivableNotFound(receivable_id.to_string()))
    }

    /// List all receivables
    pub async fn list_receivables(&self) -> FinanceResult<Vec<ReceivableAccount>> {
        self.storage.list_receivables().await
    }

    /// Edit a receivable's details
    pub async fn update_receivable(
        &mut self,
        receivable_id: &str,
        patch: &ReceivablePatch,
    ) -> FinanceResult<ReceivableAccount> {
        if patch.is_received.is_some() || patch.received_date.is_some() {
            return Err(FinanceError::Validation(
                "Received status is changed by marking the receivable received or not received"
                    .to_string(),
            ));
        }

        let mut edited = self.get_receivable_required(receivable_id).await?;
        if edited.is_received && patch.value.is_some() {
            return Err(FinanceError::Validation(format!(
                "Receivable '{}' is already received; unmark it before changing its value",
                receivable_id
            )));
        }
        edited.apply_patch(patch);
        validate_receivable(&edited)?;

        self.storage.update_receivable(receivable_id, patch).await
    }
}
