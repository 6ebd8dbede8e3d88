//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::env::VarError;

use crate::types::*;

/// Environment variable overriding [`FinanceConfig::due_soon_days`]
pub const DUE_SOON_DAYS_ENV: &str = "FINANCE_DUE_SOON_DAYS";

const DEFAULT_DUE_SOON_DAYS: i64 = 7;

/// Settings for the finance tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinanceConfig {
    /// Receivables due within this many days are flagged as due soon
    pub due_soon_days: i64,
    /// Whether text search also matches transaction observations
    pub search_observations: bool,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
            search_observations: true,
        }
    }
}

impl FinanceConfig {
    /// Load configuration from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> FinanceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, with overrides read from the environment
    pub fn from_env() -> FinanceResult<Self> {
        Self::from_due_soon_var(std::env::var(DUE_SOON_DAYS_ENV))
    }

    fn from_due_soon_var(var: Result<String, VarError>) -> FinanceResult<Self> {
        let mut config = Self::default();
        match var {
            Ok(raw) => {
                config.due_soon_days = raw.trim().parse().map_err(|_| {
                    FinanceError::Config(format!(
                        "{} must be an integer, got '{}'",
                        DUE_SOON_DAYS_ENV, raw
                    ))
                })?;
            }
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(raw)) => {
                return Err(FinanceError::Config(format!(
                    "{} is not valid unicode: {:?}",
                    DUE_SOON_DAYS_ENV, raw
                )));
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.due_soon_days < 0 {
            return Err(FinanceError::Config("dueSoonDays cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FinanceConfig::default();
        assert_eq!(config.due_soon_days, 7);
        assert!(config.search_observations);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FinanceConfig::from_json_str(r#"{ "dueSoonDays": 3 }"#).unwrap();
        assert_eq!(config.due_soon_days, 3);
        assert!(config.search_observations);
    }

    #[test]
    fn test_rejects_negative_window() {
        let result = FinanceConfig::from_json_str(r#"{ "dueSoonDays": -1 }"#);
        assert!(matches!(result, Err(FinanceError::Config(_))));
    }

    #[test]
    fn test_env_override() {
        let config = FinanceConfig::from_due_soon_var(Ok(" 14 ".to_string())).unwrap();
        assert_eq!(config.due_soon_days, 14);

        let unset = FinanceConfig::from_due_soon_var(Err(VarError::NotPresent)).unwrap();
        assert_eq!(unset, FinanceConfig::default());
    }

    #[test]
    fn test_env_rejects_bad_values() {
        assert!(matches!(
            FinanceConfig::from_due_soon_var(Ok("soon".to_string())),
            Err(FinanceError::Config(_))
        ));
        assert!(matches!(
            FinanceConfig::from_due_soon_var(Ok("-2".to_string())),
            Err(FinanceError::Config(_))
        ));
        assert!(matches!(
            FinanceConfig::from_due_soon_var(Err(VarError::NotUnicode("\u{fffd}".into()))),
            Err(FinanceError::Config(_))
        ));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        // Only this test touches the variable
        std::env::set_var(DUE_SOON_DAYS_ENV, "3");
        let config = FinanceConfig::from_env();
        std::env::remove_var(DUE_SOON_DAYS_ENV);
        assert_eq!(config.unwrap().due_soon_days, 3);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            FinanceConfig::from_json_str("{ nope"),
            Err(FinanceError::Config(_))
        ));
    }
}
