//! Core types and data structures for the finance tracker

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a receivable is billed. Informational only, reconciliation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum InstallmentType {
    /// Paid in one go
    #[default]
    Single,
    /// One of several fixed installments
    Installment,
    /// Repeats every period
    Recurring,
}

/// Direction of money movement for a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    /// Money coming in
    Revenue,
    /// Money going out
    Expense,
}

/// Provenance tag of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    /// Entered by hand
    #[default]
    Manual,
    /// Generated from a payable account
    Payable,
    /// Generated from a receivable account
    Receivable,
}

/// Money owed to the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableAccount {
    /// Unique identifier for the receivable
    pub id: String,
    /// Client expected to pay
    pub client_id: String,
    /// Revenue category the payment belongs to
    pub category_id: String,
    /// Amount due, never negative
    #[serde(with = "amount")]
    pub value: BigDecimal,
    /// Date the payment is due
    pub due_date: NaiveDate,
    /// Whether the payment has been received
    #[serde(default)]
    pub is_received: bool,
    /// When the payment was received. Set exactly when `is_received` is true.
    #[serde(default)]
    pub received_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub installment_type: InstallmentType,
    /// Free text copied into the generated transaction
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default = "now_naive")]
    pub created_at: NaiveDateTime,
    #[serde(default = "now_naive")]
    pub updated_at: NaiveDateTime,
}

impl ReceivableAccount {
    /// Create a new, not yet received, receivable
    pub fn new(
        id: String,
        client_id: String,
        category_id: String,
        value: BigDecimal,
        due_date: NaiveDate,
    ) -> Self {
        let now = now_naive();
        Self {
            id,
            client_id,
            category_id,
            value,
            due_date,
            is_received: false,
            received_date: None,
            installment_type: InstallmentType::Single,
            observations: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the installment type
    pub fn with_installment_type(mut self, installment_type: InstallmentType) -> Self {
        self.installment_type = installment_type;
        self
    }

    /// Set the observations
    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = Some(observations.into());
        self
    }

    /// Apply a patch in place. Fields left as `None` are not touched.
    pub fn apply_patch(&mut self, patch: &ReceivablePatch) {
        if let Some(client_id) = &patch.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(category_id) = &patch.category_id {
            self.category_id = category_id.clone();
        }
        if let Some(value) = &patch.value {
            self.value = value.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(is_received) = patch.is_received {
            self.is_received = is_received;
        }
        if let Some(received_date) = patch.received_date {
            self.received_date = received_date;
        }
        if let Some(installment_type) = patch.installment_type {
            self.installment_type = installment_type;
        }
        if let Some(observations) = &patch.observations {
            self.observations = observations.clone();
        }
        self.updated_at = now_naive();
    }
}

/// Explicit set of changed fields for a receivable update.
///
/// `None` means "leave unchanged". Nullable fields use a nested `Option`:
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceivablePatch {
    pub client_id: Option<String>,
    pub category_id: Option<String>,
    pub value: Option<BigDecimal>,
    pub due_date: Option<NaiveDate>,
    pub is_received: Option<bool>,
    pub received_date: Option<Option<DateTime<Utc>>>,
    pub installment_type: Option<InstallmentType>,
    pub observations: Option<Option<String>>,
}

impl ReceivablePatch {
    /// Patch that marks a receivable received at `at`
    pub fn received_at(at: DateTime<Utc>) -> Self {
        Self {
            is_received: Some(true),
            received_date: Some(Some(at)),
            ..Self::default()
        }
    }

    /// Patch that marks a receivable not received and clears its date
    pub fn unreceived() -> Self {
        Self {
            is_received: Some(false),
            received_date: Some(None),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A ledger entry recording actual money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub client_supplier_id: String,
    pub category_id: String,
    #[serde(with = "amount")]
    pub value: BigDecimal,
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    /// Originating receivable or payable. Present iff `source_type` is not manual.
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default = "now_naive")]
    pub created_at: NaiveDateTime,
    #[serde(default = "now_naive")]
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Build a stored transaction from its fields and an assigned id
    pub fn from_new(id: String, new: &NewTransaction) -> Self {
        let now = now_naive();
        Self {
            id,
            transaction_type: new.transaction_type,
            client_supplier_id: new.client_supplier_id.clone(),
            category_id: new.category_id.clone(),
            value: new.value.clone(),
            payment_date: new.payment_date,
            observations: new.observations.clone(),
            source_type: new.source_type,
            source_id: new.source_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this transaction was generated from the given receivable
    pub fn is_linked_to(&self, receivable_id: &str) -> bool {
        self.source_type == SourceType::Receivable
            && self.source_id.as_deref() == Some(receivable_id)
    }

    /// Value with sign applied: revenue positive, expense negative
    pub fn signed_value(&self) -> BigDecimal {
        match self.transaction_type {
            TransactionType::Revenue => self.value.clone(),
            TransactionType::Expense => -self.value.clone(),
        }
    }
}

/// Fields of a transaction before the ledger store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub client_supplier_id: String,
    pub category_id: String,
    #[serde(with = "amount")]
    pub value: BigDecimal,
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub source_id: Option<String>,
}

impl NewTransaction {
    /// A manually entered transaction
    pub fn manual(
        transaction_type: TransactionType,
        client_supplier_id: String,
        category_id: String,
        value: BigDecimal,
        payment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_type,
            client_supplier_id,
            category_id,
            value,
            payment_date,
            observations: None,
            source_type: SourceType::Manual,
            source_id: None,
        }
    }

    /// The revenue entry generated when `receivable` is received at `received_at`
    pub fn for_receivable(receivable: &ReceivableAccount, received_at: DateTime<Utc>) -> Self {
        Self {
            transaction_type: TransactionType::Revenue,
            client_supplier_id: receivable.client_id.clone(),
            category_id: receivable.category_id.clone(),
            value: receivable.value.clone(),
            payment_date: received_at,
            observations: receivable.observations.clone(),
            source_type: SourceType::Receivable,
            source_id: Some(receivable.id.clone()),
        }
    }

    /// Set the observations
    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = Some(observations.into());
        self
    }
}

/// Kind of counterparty in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartyKind {
    Client,
    Supplier,
}

/// A client or supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSupplier {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PartyKind,
}

/// A revenue or expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// Display status of a receivable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceivableStatus {
    Received,
    Overdue,
    DueSoon,
    Pending,
}

/// Errors that can occur in the finance core
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Receivable not found: {0}")]
    ReceivableNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::Config(err.to_string())
    }
}

/// Result type for finance operations
pub type FinanceResult<T> = Result<T, FinanceError>;

fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Serde adapter for money amounts.
///
/// Forms upstream may send amounts as strings, so both `150.5` and `"150.50"`
/// are accepted. Amounts are written back as strings to keep precision.
pub mod amount {
    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(number) => number.to_string(),
            RawAmount::Text(text) => text,
        };
        BigDecimal::from_str(text.trim())
            .map_err(|e| de::Error::custom(format!("invalid amount '{text}': {e}")))
    }
}
