//! Receivable-to-transaction reconciliation

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::traits::*;
use crate::types::*;

/// Result of marking a receivable received
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptOutcome {
    /// No linked transaction existed; one was created
    Linked(Transaction),
    /// A linked transaction already existed and was left untouched
    AlreadyLinked { transaction_id: String },
}

/// Result of marking a receivable not received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReversalOutcome {
    /// The linked transactions were deleted
    Unlinked { transaction_ids: Vec<String> },
    /// There was nothing to delete
    NothingLinked,
}

/// Result of re-running reconciliation for a single receivable
#[derive(Debug, Clone, PartialEq)]
pub enum ResyncOutcome {
    /// The receivable and ledger already agreed
    AlreadyConsistent,
    /// A missing transaction was created
    Received(ReceiptOutcome),
    /// Leftover transactions were removed
    Unreceived(ReversalOutcome),
}

/// Keeps each receivable's status and its generated ledger entry consistent.
///
/// There is no transaction spanning both stores. Every operation writes the
/// receivable first and the ledger second, awaiting each write in turn, and
/// returns the first error without rolling back. A failed second write
/// leaves the receivable authoritative; calling the same operation again
/// completes the ledger side.
///
/// Two callers marking the same receivable at the same time can both miss
/// the other's transaction in their snapshots and create a duplicate.
/// [`audit`](crate::reconciliation::audit) reports such duplicates.
pub struct ReconciliationEngine<R: ReceivableStore, L: LedgerStore> {
    receivables: R,
    ledger: L,
    clock: Arc<dyn Clock>,
}

impl<R: ReceivableStore, L: LedgerStore> ReconciliationEngine<R, L> {
    /// Create an engine using the system clock
    pub fn new(receivables: R, ledger: L) -> Self {
        Self::with_clock(receivables, ledger, Arc::new(SystemClock))
    }

    /// Create an engine with a custom clock
    pub fn with_clock(receivables: R, ledger: L, clock: Arc<dyn Clock>) -> Self {
        Self {
            receivables,
            ledger,
            clock,
        }
    }

    pub fn receivable_store(&self) -> &R {
        &self.receivables
    }

    pub fn ledger_store(&self) -> &L {
        &self.ledger
    }

    /// Read the current transaction collection once
    pub async fn ledger_snapshot(&self) -> FinanceResult<Vec<Transaction>> {
        self.ledger.list_transactions().await
    }

    /// Mark `receivable` received and make sure exactly one revenue
    /// transaction is linked to it.
    ///
    /// `ledger_snapshot` is the transaction collection as read by the caller;
    /// it is not re-read during the call.
    pub async fn mark_received(
        &mut self,
        receivable: &ReceivableAccount,
        ledger_snapshot: &[Transaction],
    ) -> FinanceResult<ReceiptOutcome> {
        let received_at = self.clock.now();

        if let Some(existing) = find_linked(ledger_snapshot, &receivable.id) {
            self.receivables
                .update_receivable(&receivable.id, &ReceivablePatch::received_at(received_at))
                .await?;
            debug!(
                receivable_id = %receivable.id,
                transaction_id = %existing.id,
                "receivable re-confirmed, linked transaction already present"
            );
            return Ok(ReceiptOutcome::AlreadyLinked {
                transaction_id: existing.id.clone(),
            });
        }

        // Receivable first: a failure after this point is healed by retrying.
        self.receivables
            .update_receivable(&receivable.id, &ReceivablePatch::received_at(received_at))
            .await?;

        // Both records carry the same instant.
        let new_transaction = NewTransaction::for_receivable(receivable, received_at);
        let created = match self.ledger.create_transaction(&new_transaction).await {
            Ok(created) => created,
            Err(err) => {
                warn!(
                    receivable_id = %receivable.id,
                    error = %err,
                    "receivable marked received but its transaction was not created"
                );
                return Err(err);
            }
        };

        info!(
            receivable_id = %receivable.id,
            transaction_id = %created.id,
            value = %created.value,
            "receivable received, revenue transaction created"
        );
        Ok(ReceiptOutcome::Linked(created))
    }

    /// Mark `receivable` not received and delete its linked transactions.
    pub async fn mark_unreceived(
        &mut self,
        receivable: &ReceivableAccount,
        ledger_snapshot: &[Transaction],
    ) -> FinanceResult<ReversalOutcome> {
        self.receivables
            .update_receivable(&receivable.id, &ReceivablePatch::unreceived())
            .await?;

        let linked: Vec<&Transaction> = ledger_snapshot
            .iter()
            .filter(|t| t.is_linked_to(&receivable.id))
            .collect();

        if linked.is_empty() {
            debug!(receivable_id = %receivable.id, "receivable unmarked, no linked transaction");
            return Ok(ReversalOutcome::NothingLinked);
        }

        let mut transaction_ids = Vec::with_capacity(linked.len());
        for transaction in linked {
            if let Err(err) = self.ledger.delete_transaction(&transaction.id).await {
                warn!(
                    receivable_id = %receivable.id,
                    transaction_id = %transaction.id,
                    error = %err,
                    "receivable unmarked but its transaction was not deleted"
                );
                return Err(err);
            }
            transaction_ids.push(transaction.id.clone());
        }

        info!(
            receivable_id = %receivable.id,
            deleted = transaction_ids.len(),
            "receivable unmarked, linked transaction deleted"
        );
        Ok(ReversalOutcome::Unlinked { transaction_ids })
    }

    /// Delete a receivable once `confirm` agrees.
    ///
    /// Returns `false` without touching the store when the caller declines.
    /// Linked transactions are left in place.
    pub async fn delete_receivable<F>(
        &mut self,
        receivable_id: &str,
        confirm: F,
    ) -> FinanceResult<bool>
    where
        F: FnOnce(&str) -> bool + Send,
    {
        if !confirm(receivable_id) {
            debug!(receivable_id, "receivable deletion declined");
            return Ok(false);
        }
        self.receivables.delete_receivable(receivable_id).await?;
        info!(receivable_id, "receivable deleted");
        Ok(true)
    }

    /// Bring the ledger in line with the receivable's current flag.
    ///
    /// This is the recovery path after a partially failed operation.
    pub async fn resync(
        &mut self,
        receivable: &ReceivableAccount,
        ledger_snapshot: &[Transaction],
    ) -> FinanceResult<ResyncOutcome> {
        let has_link = find_linked(ledger_snapshot, &receivable.id).is_some();
        match (receivable.is_received, has_link) {
            (true, false) => Ok(ResyncOutcome::Received(
                self.mark_received(receivable, ledger_snapshot).await?,
            )),
            (false, true) => Ok(ResyncOutcome::Unreceived(
                self.mark_unreceived(receivable, ledger_snapshot).await?,
            )),
            _ => Ok(ResyncOutcome::AlreadyConsistent),
        }
    }
}

/// First transaction in `transactions` generated from `receivable_id`
pub fn find_linked<'a>(
    transactions: &'a [Transaction],
    receivable_id: &str,
) -> Option<&'a Transaction> {
    transactions.iter().find(|t| t.is_linked_to(receivable_id))
}
