//! Budget and spending limit models
//!
//! Both are monthly caps on a free-form category string. Budgets are planning
//! targets shown with progress; spending limits drive alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, SpendingLimitId};
use super::money::Money;

/// A monthly budget for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Category matched against transaction categories
    pub category: String,

    /// Planned monthly spend
    pub amount: Money,

    /// Optional display color ("#22c55e")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category: category.into(),
            amount,
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), CapValidationError> {
        validate_cap(&self.category, self.amount)
    }
}

/// A monthly spending limit with alerting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingLimit {
    pub id: SpendingLimitId,

    /// Category matched against transaction categories
    pub category: String,

    /// Monthly threshold
    pub limit: Money,

    /// Disabled limits are kept but produce no alerts
    pub enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpendingLimit {
    pub fn new(category: impl Into<String>, limit: Money) -> Self {
        let now = Utc::now();
        Self {
            id: SpendingLimitId::new(),
            category: category.into(),
            limit,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), CapValidationError> {
        validate_cap(&self.category, self.limit)
    }
}

fn validate_cap(category: &str, amount: Money) -> Result<(), CapValidationError> {
    if category.trim().is_empty() {
        return Err(CapValidationError::EmptyCategory);
    }
    if !amount.is_positive() {
        return Err(CapValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Validation errors shared by budgets and spending limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapValidationError {
    EmptyCategory,
    NonPositiveAmount(Money),
}

impl fmt::Display for CapValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for CapValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_validation() {
        assert!(Budget::new("Groceries", Money::from_units(20_000)).validate().is_ok());
        assert_eq!(
            Budget::new(" ", Money::from_units(1)).validate(),
            Err(CapValidationError::EmptyCategory)
        );
        assert!(matches!(
            Budget::new("Cafe", Money::zero()).validate(),
            Err(CapValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_limit_toggle() {
        let mut limit = SpendingLimit::new("Cafe", Money::from_units(5000));
        assert!(limit.enabled);
        limit.set_enabled(false);
        assert!(!limit.enabled);
    }
}
