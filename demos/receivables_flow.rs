//! Receivable lifecycle example
//!
//! This example demonstrates:
//! - Creating receivables
//! - Marking them received and undoing it
//! - Auditing the ledger and repairing it after a failed write
//! - Status badges and transaction summaries

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use finance_core::{
    logging::init_tracing,
    utils::{MemoryStorage, StoreOperation},
    Category, ClientSupplier, Directory, FinanceConfig, FinanceResult, FinanceTracker,
    InstallmentType, NewTransaction, PartyKind, ReceivableAccount, TransactionFilter,
    TransactionType,
};
use std::str::FromStr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> FinanceResult<()> {
    init_tracing("finance_core=debug")?;

    println!("Finance Core - Receivables Flow Example");
    println!("=======================================\n");

    let directory = Directory::new(
        vec![
            ClientSupplier {
                id: "acme".to_string(),
                name: "Acme Ltda".to_string(),
                kind: PartyKind::Client,
            },
            ClientSupplier {
                id: "landlord".to_string(),
                name: "Downtown Offices".to_string(),
                kind: PartyKind::Supplier,
            },
        ],
        vec![
            Category {
                id: "consulting".to_string(),
                name: "Consulting".to_string(),
                kind: TransactionType::Revenue,
            },
            Category {
                id: "rent".to_string(),
                name: "Rent".to_string(),
                kind: TransactionType::Expense,
            },
        ],
    );

    let storage = MemoryStorage::new();
    let config = FinanceConfig::from_env()?;
    let mut tracker = FinanceTracker::with_config(
        storage.clone(),
        config,
        Arc::new(finance_core::SystemClock),
    )
    .with_directory(directory);

    let today = Utc::now().date_naive();

    println!("1. Creating receivables...");
    tracker
        .create_receivable(
            ReceivableAccount::new(
                "inv-001".to_string(),
                "acme".to_string(),
                "consulting".to_string(),
                BigDecimal::from_str("1500.00").expect("valid amount"),
                today + Duration::days(3),
            )
            .with_observations("January retainer"),
        )
        .await?;
    tracker
        .create_receivable(
            ReceivableAccount::new(
                "inv-002".to_string(),
                "acme".to_string(),
                "consulting".to_string(),
                BigDecimal::from(800),
                today - Duration::days(2),
            )
            .with_installment_type(InstallmentType::Installment),
        )
        .await?;

    for receivable in tracker.list_receivables().await? {
        println!(
            "   {} due {} -> {:?}",
            receivable.id,
            receivable.due_date,
            tracker.status_of(&receivable)
        );
    }

    println!("\n2. Recording rent...");
    tracker
        .record_transaction(NewTransaction::manual(
            TransactionType::Expense,
            "landlord".to_string(),
            "rent".to_string(),
            BigDecimal::from(600),
            Utc::now(),
        ))
        .await?;

    println!("\n3. Marking inv-001 received...");
    let outcome = tracker.mark_received("inv-001").await?;
    println!("   {:?}", outcome);

    println!("\n4. Marking inv-001 received again (no duplicate)...");
    let outcome = tracker.mark_received("inv-001").await?;
    println!("   {:?}", outcome);

    println!("\n5. Simulating a ledger failure on inv-002...");
    storage.fail_next(StoreOperation::CreateTransaction, 1)?;
    if let Err(err) = tracker.mark_received("inv-002").await {
        println!("   Operation failed: {}", err);
    }
    let report = tracker.audit().await?;
    println!("   Audit consistent: {}", report.is_consistent);
    for issue in &report.issues {
        println!("   - {:?}", issue);
    }
    println!("   Resync: {:?}", tracker.resync("inv-002").await?);
    println!("   Audit consistent: {}", tracker.audit().await?.is_consistent);

    println!("\n6. Summaries...");
    let summary = tracker
        .financial_summary(&TransactionFilter::default())
        .await?;
    println!("   Revenue: {}", summary.total_revenue);
    println!("   Expense: {}", summary.total_expense);
    println!("   Balance: {}", summary.balance);
    for category in tracker
        .category_summary(&TransactionFilter::default())
        .await?
    {
        println!(
            "   {}: +{} / -{}",
            category.name, category.revenue, category.expense
        );
    }

    println!("\n7. Undoing inv-001...");
    println!("   {:?}", tracker.mark_unreceived("inv-001").await?);
    println!(
        "   Outstanding: {}",
        tracker.receivable_summary().await?.outstanding()
    );

    println!("\nExample completed successfully!");
    Ok(())
}
