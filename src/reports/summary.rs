//! Transaction filtering and aggregate summaries

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::directory::Directory;
use crate::reports::status::classify;
use crate::types::*;

/// Criteria for narrowing the transaction list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionFilter {
    /// Case-insensitive text matched against client/supplier name, category
    /// name and observations
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    /// Inclusive lower bound on the payment day
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the payment day
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn of_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Whether `transaction` passes every criterion
    pub fn matches(
        &self,
        transaction: &Transaction,
        directory: &Directory,
        search_observations: bool,
    ) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            let contains = |text: &str| text.to_lowercase().contains(&needle);
            let party = directory
                .party(&transaction.client_supplier_id)
                .is_some_and(|p| contains(&p.name));
            let category = directory
                .category(&transaction.category_id)
                .is_some_and(|c| contains(&c.name));
            let notes = search_observations
                && transaction.observations.as_deref().is_some_and(contains);
            if !(party || category || notes) {
                return false;
            }
        }

        if let Some(category_id) = &self.category_id {
            if &transaction.category_id != category_id {
                return false;
            }
        }

        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }

        let day = transaction.payment_date.date_naive();
        if let Some(start) = self.start_date {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }

        true
    }
}

/// Apply `filter` and sort the result by payment date, newest first
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    directory: &Directory,
    search_observations: bool,
) -> Vec<Transaction> {
    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|t| filter.matches(t, directory, search_observations))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    filtered
}

/// Revenue and expense totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: BigDecimal,
    pub total_expense: BigDecimal,
    /// Revenue minus expense
    pub balance: BigDecimal,
    pub transaction_count: usize,
}

impl FinancialSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_revenue = total_of(transactions, TransactionType::Revenue);
        let total_expense = total_of(transactions, TransactionType::Expense);
        let balance = &total_revenue - &total_expense;
        Self {
            total_revenue,
            total_expense,
            balance,
            transaction_count: transactions.len(),
        }
    }
}

fn total_of(transactions: &[Transaction], transaction_type: TransactionType) -> BigDecimal {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| &t.value)
        .sum()
}

/// Revenue and expense booked against one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category_id: String,
    pub name: String,
    pub revenue: BigDecimal,
    pub expense: BigDecimal,
}

/// Per-category totals, ordered by category name.
///
/// Transactions whose category is not in the directory are left out.
pub fn category_summary(
    transactions: &[Transaction],
    directory: &Directory,
) -> Vec<CategorySummary> {
    let mut by_category: HashMap<&str, CategorySummary> = HashMap::new();

    for transaction in transactions {
        let Some(category) = directory.category(&transaction.category_id) else {
            continue;
        };
        let entry = by_category
            .entry(category.id.as_str())
            .or_insert_with(|| CategorySummary {
                category_id: category.id.clone(),
                name: category.name.clone(),
                revenue: BigDecimal::from(0),
                expense: BigDecimal::from(0),
            });
        match transaction.transaction_type {
            TransactionType::Revenue => entry.revenue += &transaction.value,
            TransactionType::Expense => entry.expense += &transaction.value,
        }
    }

    let mut summaries: Vec<CategorySummary> = by_category.into_values().collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.category_id.cmp(&b.category_id)));
    summaries
}

/// Count and amount of receivables in one status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotal {
    pub count: usize,
    pub total: BigDecimal,
}

impl Default for StatusTotal {
    fn default() -> Self {
        Self {
            count: 0,
            total: BigDecimal::from(0),
        }
    }
}

/// Receivables grouped by display status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableSummary {
    pub received: StatusTotal,
    pub overdue: StatusTotal,
    pub due_soon: StatusTotal,
    pub pending: StatusTotal,
}

impl ReceivableSummary {
    pub fn from_receivables(
        receivables: &[ReceivableAccount],
        today: NaiveDate,
        due_soon_days: i64,
    ) -> Self {
        let mut summary = Self::default();
        for receivable in receivables {
            let status = classify(
                receivable.is_received,
                receivable.due_date,
                today,
                due_soon_days,
            );
            let bucket = match status {
                ReceivableStatus::Received => &mut summary.received,
                ReceivableStatus::Overdue => &mut summary.overdue,
                ReceivableStatus::DueSoon => &mut summary.due_soon,
                ReceivableStatus::Pending => &mut summary.pending,
            };
            bucket.count += 1;
            bucket.total += &receivable.value;
        }
        summary
    }

    /// Amount still to be received
    pub fn outstanding(&self) -> BigDecimal {
        &self.overdue.total + &self.due_soon.total + &self.pending.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn directory() -> Directory {
        Directory::new(
            vec![
                ClientSupplier {
                    id: "c1".to_string(),
                    name: "Acme Ltda".to_string(),
                    kind: PartyKind::Client,
                },
                ClientSupplier {
                    id: "s1".to_string(),
                    name: "Office Supplies".to_string(),
                    kind: PartyKind::Supplier,
                },
            ],
            vec![
                Category {
                    id: "cat1".to_string(),
                    name: "Consulting".to_string(),
                    kind: TransactionType::Revenue,
                },
                Category {
                    id: "cat2".to_string(),
                    name: "Administrative".to_string(),
                    kind: TransactionType::Expense,
                },
            ],
        )
    }

    fn transaction(
        id: &str,
        transaction_type: TransactionType,
        party: &str,
        category: &str,
        value: i64,
        day: u32,
    ) -> Transaction {
        Transaction::from_new(
            id.to_string(),
            &NewTransaction::manual(
                transaction_type,
                party.to_string(),
                category.to_string(),
                BigDecimal::from(value),
                Utc.with_ymd_and_hms(2024, 2, day, 15, 0, 0).unwrap(),
            ),
        )
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            transaction("t1", TransactionType::Revenue, "c1", "cat1", 500, 1),
            transaction("t2", TransactionType::Expense, "s1", "cat2", 120, 10),
            transaction("t3", TransactionType::Revenue, "c1", "cat1", 300, 20),
            transaction("t4", TransactionType::Expense, "s1", "unknown", 80, 5),
        ]
    }

    fn search(transactions: &[Transaction], term: &str, observations: bool) -> Vec<Transaction> {
        let filter = TransactionFilter::default().search(term);
        filter_transactions(transactions, &filter, &directory(), observations)
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_no_filter_sorts_newest_first() {
        let result =
            filter_transactions(&ledger(), &TransactionFilter::default(), &directory(), true);
        assert_eq!(ids(&result), vec!["t3", "t2", "t4", "t1"]);
    }

    #[test]
    fn test_search_matches_names_and_observations() {
        let mut transactions = ledger();
        transactions[3].observations = Some("Printer TONER".to_string());

        let by_party = search(&transactions, "acme", true);
        assert_eq!(ids(&by_party), vec!["t3", "t1"]);

        let by_category = search(&transactions, "ADMIN", true);
        assert_eq!(ids(&by_category), vec!["t2"]);

        let by_notes = search(&transactions, "toner", true);
        assert_eq!(ids(&by_notes), vec!["t4"]);

        let notes_disabled = search(&transactions, "toner", false);
        assert!(notes_disabled.is_empty());
    }

    #[test]
    fn test_type_category_and_date_bounds() {
        let filter = TransactionFilter::default()
            .of_type(TransactionType::Revenue)
            .category("cat1")
            .between(
                NaiveDate::from_ymd_opt(2024, 2, 1),
                NaiveDate::from_ymd_opt(2024, 2, 19),
            );
        assert_eq!(ids(&filter_transactions(&ledger(), &filter, &directory(), true)), vec!["t1"]);

        // End bound includes the whole day
        let same_day =
            TransactionFilter::default().between(None, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(ids(&filter_transactions(&ledger(), &same_day, &directory(), true)), vec!["t1"]);
    }

    #[test]
    fn test_financial_summary() {
        let summary = FinancialSummary::from_transactions(&ledger());
        assert_eq!(summary.total_revenue, BigDecimal::from(800));
        assert_eq!(summary.total_expense, BigDecimal::from(200));
        assert_eq!(summary.balance, BigDecimal::from(600));
        assert_eq!(summary.transaction_count, 4);

        let empty = FinancialSummary::from_transactions(&[]);
        assert_eq!(empty.balance, BigDecimal::from(0));
    }

    #[test]
    fn test_category_summary_skips_unknown() {
        let summaries = category_summary(&ledger(), &directory());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Administrative");
        assert_eq!(summaries[0].expense, BigDecimal::from(120));
        assert_eq!(summaries[1].name, "Consulting");
        assert_eq!(summaries[1].revenue, BigDecimal::from(800));
        assert_eq!(summaries[1].expense, BigDecimal::from(0));
    }

    #[test]
    fn test_receivable_summary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let make = |id: &str, due: NaiveDate, value: i64| {
            ReceivableAccount::new(
                id.to_string(),
                "c1".to_string(),
                "cat1".to_string(),
                BigDecimal::from(value),
                due,
            )
        };
        let mut received = make("r1", today, 100);
        received.apply_patch(&ReceivablePatch::received_at(Utc::now()));
        let receivables = vec![
            received,
            make("r2", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 50),
            make("r3", NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(), 30),
            make("r4", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 20),
        ];

        let summary = ReceivableSummary::from_receivables(&receivables, today, 7);

        assert_eq!(summary.received.count, 1);
        assert_eq!(summary.overdue.total, BigDecimal::from(50));
        assert_eq!(summary.due_soon.count, 1);
        assert_eq!(summary.pending.total, BigDecimal::from(20));
        assert_eq!(summary.outstanding(), BigDecimal::from(100));
    }
}
