//! Validation utilities

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

const MAX_REFERENCE_CHARS: usize = 64;
const MAX_OBSERVATIONS_CHARS: usize = 500;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> FinanceResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(FinanceError::Validation("Amount cannot be negative".to_string()))
    } else {
        Ok(())
    }
}

/// Parse an amount typed into a form, accepting a decimal comma
pub fn parse_amount(input: &str) -> FinanceResult<BigDecimal> {
    let normalized = input.trim().replace(',', ".");
    BigDecimal::from_str(&normalized)
        .map_err(|_| FinanceError::Validation(format!("'{}' is not a valid amount", input)))
}

/// Validate that a record reference is present
pub fn validate_reference(field: &str, value: &str) -> FinanceResult<()> {
    if value.trim().is_empty() {
        return Err(FinanceError::Validation(format!("{} cannot be empty", field)));
    }

    if value.chars().count() > MAX_REFERENCE_CHARS {
        return Err(FinanceError::Validation(format!(
            "{} cannot exceed {} characters",
            field, MAX_REFERENCE_CHARS
        )));
    }

    Ok(())
}

/// Validate observations length
pub fn validate_observations(observations: Option<&str>) -> FinanceResult<()> {
    if let Some(text) = observations {
        if text.chars().count() > MAX_OBSERVATIONS_CHARS {
            return Err(FinanceError::Validation(format!(
                "Observations cannot exceed {} characters",
                MAX_OBSERVATIONS_CHARS
            )));
        }
    }

    Ok(())
}

/// Validate a receivable before saving
pub fn validate_receivable(receivable: &ReceivableAccount) -> FinanceResult<()> {
    validate_reference("Receivable ID", &receivable.id)?;
    validate_reference("Client ID", &receivable.client_id)?;
    validate_reference("Category ID", &receivable.category_id)?;
    validate_non_negative_amount(&receivable.value)?;
    validate_observations(receivable.observations.as_deref())?;

    // received_date is set exactly when the receivable is received
    if receivable.is_received != receivable.received_date.is_some() {
        return Err(FinanceError::Validation(format!(
            "Receivable '{}' must have a received date exactly when it is received",
            receivable.id
        )));
    }

    Ok(())
}

/// Validate a transaction before creating it
pub fn validate_new_transaction(transaction: &NewTransaction) -> FinanceResult<()> {
    validate_reference("Client/supplier ID", &transaction.client_supplier_id)?;
    validate_reference("Category ID", &transaction.category_id)?;
    validate_non_negative_amount(&transaction.value)?;
    validate_observations(transaction.observations.as_deref())?;
    validate_source(transaction.source_type, transaction.source_id.as_deref())
}

/// Validate that the source id is present iff the source type is not manual
pub fn validate_source(source_type: SourceType, source_id: Option<&str>) -> FinanceResult<()> {
    match (source_type, source_id) {
        (SourceType::Manual, None) => Ok(()),
        (SourceType::Manual, Some(_)) => Err(FinanceError::Validation(
            "Manual transactions cannot reference a source record".to_string(),
        )),
        (_, Some(id)) => validate_reference("Source ID", id),
        (other, None) => Err(FinanceError::Validation(format!(
            "{:?} transactions must reference their source record",
            other
        ))),
    }
}
