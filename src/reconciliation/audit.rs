//! Consistency checks between receivables and the ledger

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::types::*;

/// A single violation of the receivable/transaction pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReconciliationIssue {
    /// Received, but no transaction is linked
    MissingTransaction { receivable_id: String },
    /// Not received, but a transaction is still linked
    UnexpectedTransaction {
        receivable_id: String,
        transaction_id: String,
    },
    /// More than one transaction is linked
    DuplicateTransactions {
        receivable_id: String,
        transaction_ids: Vec<String>,
    },
    /// Linked transaction records a different amount
    ValueMismatch {
        receivable_id: String,
        transaction_id: String,
        expected: BigDecimal,
        actual: BigDecimal,
    },
    /// Linked transaction's payment date differs from the received date
    PaymentDateMismatch {
        receivable_id: String,
        transaction_id: String,
        expected: Option<DateTime<Utc>>,
        actual: DateTime<Utc>,
    },
    /// Linked transaction is booked as an expense
    NotRevenue {
        receivable_id: String,
        transaction_id: String,
    },
    /// Transaction points at a receivable that does not exist
    OrphanTransaction {
        transaction_id: String,
        source_id: String,
    },
}

/// Outcome of [`audit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub is_consistent: bool,
    pub receivables_checked: usize,
    pub linked_transactions: usize,
    pub issues: Vec<ReconciliationIssue>,
}

impl ReconciliationReport {
    /// Issues that concern a given receivable
    pub fn issues_for<'a>(
        &'a self,
        receivable_id: &'a str,
    ) -> impl Iterator<Item = &'a ReconciliationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.receivable_id() == Some(receivable_id))
    }
}

impl ReconciliationIssue {
    pub fn receivable_id(&self) -> Option<&str> {
        match self {
            ReconciliationIssue::MissingTransaction { receivable_id }
            | ReconciliationIssue::UnexpectedTransaction { receivable_id, .. }
            | ReconciliationIssue::DuplicateTransactions { receivable_id, .. }
            | ReconciliationIssue::ValueMismatch { receivable_id, .. }
            | ReconciliationIssue::PaymentDateMismatch { receivable_id, .. }
            | ReconciliationIssue::NotRevenue { receivable_id, .. } => Some(receivable_id),
            ReconciliationIssue::OrphanTransaction { .. } => None,
        }
    }
}

/// Check every receivable against the transactions generated from it.
pub fn audit(
    receivables: &[ReceivableAccount],
    transactions: &[Transaction],
) -> ReconciliationReport {
    let mut links: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions {
        if transaction.source_type != SourceType::Receivable {
            continue;
        }
        if let Some(source_id) = transaction.source_id.as_deref() {
            links.entry(source_id).or_default().push(transaction);
        }
    }
    let linked_transactions = links.values().map(Vec::len).sum();

    let known: HashMap<&str, &ReceivableAccount> =
        receivables.iter().map(|r| (r.id.as_str(), r)).collect();
    let mut issues = Vec::new();

    for receivable in receivables {
        let linked = links.get(receivable.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);

        if linked.len() > 1 {
            issues.push(ReconciliationIssue::DuplicateTransactions {
                receivable_id: receivable.id.clone(),
                transaction_ids: linked.iter().map(|t| t.id.clone()).collect(),
            });
        }

        if !receivable.is_received {
            for transaction in linked {
                issues.push(ReconciliationIssue::UnexpectedTransaction {
                    receivable_id: receivable.id.clone(),
                    transaction_id: transaction.id.clone(),
                });
            }
            continue;
        }

        if linked.is_empty() {
            issues.push(ReconciliationIssue::MissingTransaction {
                receivable_id: receivable.id.clone(),
            });
        }

        for transaction in linked {
            if transaction.transaction_type != TransactionType::Revenue {
                issues.push(ReconciliationIssue::NotRevenue {
                    receivable_id: receivable.id.clone(),
                    transaction_id: transaction.id.clone(),
                });
            }
            if transaction.value != receivable.value {
                issues.push(ReconciliationIssue::ValueMismatch {
                    receivable_id: receivable.id.clone(),
                    transaction_id: transaction.id.clone(),
                    expected: receivable.value.clone(),
                    actual: transaction.value.clone(),
                });
            }
            if receivable.received_date != Some(transaction.payment_date) {
                issues.push(ReconciliationIssue::PaymentDateMismatch {
                    receivable_id: receivable.id.clone(),
                    transaction_id: transaction.id.clone(),
                    expected: receivable.received_date,
                    actual: transaction.payment_date,
                });
            }
        }
    }

    for (source_id, linked) in &links {
        if known.contains_key(source_id) {
            continue;
        }
        for transaction in linked {
            issues.push(ReconciliationIssue::OrphanTransaction {
                transaction_id: transaction.id.clone(),
                source_id: source_id.to_string(),
            });
        }
    }

    for issue in &issues {
        warn!(?issue, "reconciliation issue");
    }

    ReconciliationReport {
        is_consistent: issues.is_empty(),
        receivables_checked: receivables.len(),
        linked_transactions,
        issues,
    }
}
