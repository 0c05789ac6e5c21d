//! Budget service
//!
//! Monthly per-category budgets and their status against current-month
//! spending.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::calc::{alerts::classify_percent, usage_percent, AlertLevel};
use crate::config::settings::AlertThresholds;
use crate::error::{BankError, BankResult};
use crate::models::{months_ago, Budget, BudgetId, Money};
use crate::storage::Storage;

/// Spending in `category` during the calendar month of `today`
///
/// Counts outgoing transactions only; transfers between own accounts are not
/// spending.
pub fn spent_this_month(storage: &Storage, category: &str, today: NaiveDate) -> BankResult<Money> {
    Ok(storage
        .transactions
        .filter(|t| {
            t.is_expense() && t.category_matches(category) && months_ago(t.date, today) == 0
        })?
        .iter()
        .map(|t| t.amount)
        .sum())
}

/// A budget with its computed month-to-date figures
#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Money,
    /// Budget minus spent; negative when overspent
    pub remaining: Money,
    pub percent: f64,
    pub level: Option<AlertLevel>,
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget for a category
    pub fn create(&self, category: &str, amount: Money, color: Option<String>) -> BankResult<Budget> {
        let category = category.trim();
        if self.find(category)?.is_some() {
            return Err(BankError::Duplicate {
                entity_type: "Budget",
                identifier: category.to_string(),
            });
        }

        let mut budget = Budget::new(category, amount);
        budget.color = color;
        budget
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;
        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;

        info!(category = %budget.category, amount = %budget.amount, "budget created");
        Ok(budget)
    }

    /// Find a budget by exact category (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<Budget>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .budgets
            .find(|b| b.category.to_lowercase() == wanted || b.id.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> BankResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| BankError::budget_not_found(identifier))
    }

    pub fn list(&self) -> BankResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Change the amount, category or color of a budget
    pub fn update(
        &self,
        id: BudgetId,
        category: Option<&str>,
        amount: Option<Money>,
        color: Option<String>,
    ) -> BankResult<Budget> {
        let mut budget = self.storage.budgets.require(id)?;
        let before = budget.clone();

        if let Some(category) = category {
            let category = category.trim();
            if let Some(other) = self.find(category)? {
                if other.id != id {
                    return Err(BankError::Duplicate {
                        entity_type: "Budget",
                        identifier: category.to_string(),
                    });
                }
            }
            budget.category = category.to_string();
        }
        if let Some(amount) = amount {
            budget.amount = amount;
        }
        if color.is_some() {
            budget.color = color;
        }
        budget
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;
        budget.updated_at = Utc::now();

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;
        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &before,
            &budget,
        )?;
        Ok(budget)
    }

    pub fn delete(&self, id: BudgetId) -> BankResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(id)?
            .ok_or_else(|| BankError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;
        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;
        Ok(budget)
    }

    /// Month-to-date status of every budget
    pub fn status(
        &self,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> BankResult<Vec<BudgetStatus>> {
        self.list()?
            .into_iter()
            .map(|budget| {
                let spent = spent_this_month(self.storage, &budget.category, today)?;
                let percent = usage_percent(spent, budget.amount);
                Ok(BudgetStatus {
                    remaining: budget.amount - spent,
                    level: classify_percent(percent, thresholds),
                    percent,
                    spent,
                    budget,
                })
            })
            .collect()
    }
}
