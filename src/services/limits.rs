//! Spending limit service
//!
//! Monthly category caps that raise alerts at the warning and exceeded
//! thresholds. Dismissed alerts are remembered per category and tier until
//! the set of limits changes.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::calc::{alerts::classify_percent, usage_percent, AlertLevel};
use crate::config::settings::AlertThresholds;
use crate::error::{BankError, BankResult};
use crate::models::{Money, SpendingLimit, SpendingLimitId};
use crate::storage::{DismissedAlert, Storage};

use super::budget::spent_this_month;

/// An active alert for one limit
#[derive(Debug, Clone)]
pub struct SpendingAlert {
    pub limit: SpendingLimit,
    pub spent: Money,
    pub percent: f64,
    pub level: AlertLevel,
}

impl SpendingAlert {
    pub fn key(&self) -> DismissedAlert {
        DismissedAlert::new(&self.limit.category, self.level)
    }

    /// One-line message for the alert banner
    pub fn message(&self, currency: &str) -> String {
        match self.level {
            AlertLevel::Warning => format!(
                "{}: {:.0}% of the monthly limit used ({} of {})",
                self.limit.category,
                self.percent,
                self.spent.format_with_symbol(currency),
                self.limit.limit.format_with_symbol(currency)
            ),
            AlertLevel::Exceeded => format!(
                "{}: monthly limit exceeded ({} of {})",
                self.limit.category,
                self.spent.format_with_symbol(currency),
                self.limit.limit.format_with_symbol(currency)
            ),
        }
    }
}

/// A limit with its month-to-date usage
#[derive(Debug, Clone)]
pub struct LimitStatus {
    pub limit: SpendingLimit,
    pub spent: Money,
    pub percent: f64,
    pub level: Option<AlertLevel>,
}

/// Service for spending limits and their alerts
pub struct LimitService<'a> {
    storage: &'a Storage,
}

impl<'a> LimitService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, category: &str, limit: Money) -> BankResult<SpendingLimit> {
        let category = category.trim();
        if self.find(category)?.is_some() {
            return Err(BankError::Duplicate {
                entity_type: "Spending limit",
                identifier: category.to_string(),
            });
        }

        let record = SpendingLimit::new(category, limit);
        record
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;

        self.storage.limits.upsert(record.clone())?;
        self.storage.limits.save()?;
        self.storage.log_create(
            EntityType::SpendingLimit,
            record.id.to_string(),
            Some(record.category.clone()),
            &record,
        )?;
        self.reset_dismissed()?;

        info!(category = %record.category, limit = %record.limit, "spending limit created");
        Ok(record)
    }

    /// Find a limit by exact category (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<SpendingLimit>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .limits
            .find(|l| l.category.to_lowercase() == wanted || l.id.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> BankResult<SpendingLimit> {
        self.find(identifier)?
            .ok_or_else(|| BankError::limit_not_found(identifier))
    }

    pub fn list(&self) -> BankResult<Vec<SpendingLimit>> {
        self.storage.limits.get_all()
    }

    /// Change the category or amount of a limit
    pub fn update(
        &self,
        id: SpendingLimitId,
        category: Option<&str>,
        limit: Option<Money>,
    ) -> BankResult<SpendingLimit> {
        let mut record = self.storage.limits.require(id)?;
        let before = record.clone();

        if let Some(category) = category {
            let category = category.trim();
            if self.find(category)?.is_some_and(|other| other.id != id) {
                return Err(BankError::Duplicate {
                    entity_type: "Spending limit",
                    identifier: category.to_string(),
                });
            }
            record.category = category.to_string();
        }
        if let Some(limit) = limit {
            record.limit = limit;
        }
        record
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;
        record.updated_at = Utc::now();

        self.persist_update(&before, &record)?;
        Ok(record)
    }

    /// Enable or disable a limit
    pub fn set_enabled(&self, id: SpendingLimitId, enabled: bool) -> BankResult<SpendingLimit> {
        let mut record = self.storage.limits.require(id)?;
        let before = record.clone();
        record.set_enabled(enabled);
        self.persist_update(&before, &record)?;
        Ok(record)
    }

    /// Flip the enabled flag
    pub fn toggle(&self, id: SpendingLimitId) -> BankResult<SpendingLimit> {
        let enabled = self.storage.limits.require(id)?.enabled;
        self.set_enabled(id, !enabled)
    }

    pub fn delete(&self, id: SpendingLimitId) -> BankResult<SpendingLimit> {
        let record = self
            .storage
            .limits
            .delete(id)?
            .ok_or_else(|| BankError::limit_not_found(id.to_string()))?;
        self.storage.limits.save()?;
        self.storage.log_delete(
            EntityType::SpendingLimit,
            record.id.to_string(),
            Some(record.category.clone()),
            &record,
        )?;
        self.reset_dismissed()?;
        Ok(record)
    }

    /// Month-to-date usage of every limit, enabled or not
    pub fn status(
        &self,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> BankResult<Vec<LimitStatus>> {
        self.list()?
            .into_iter()
            .map(|limit| {
                let spent = spent_this_month(self.storage, &limit.category, today)?;
                let percent = usage_percent(spent, limit.limit);
                let level = if limit.enabled {
                    classify_percent(percent, thresholds)
                } else {
                    None
                };
                Ok(LimitStatus {
                    limit,
                    spent,
                    percent,
                    level,
                })
            })
            .collect()
    }

    /// Alerts for enabled limits that have not been dismissed
    ///
    /// Exceeded alerts come first.
    pub fn alerts(
        &self,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> BankResult<Vec<SpendingAlert>> {
        let dismissed = self.storage.alert_state.get()?.dismissed;
        let mut alerts: Vec<SpendingAlert> = self
            .status(today, thresholds)?
            .into_iter()
            .filter_map(|s| {
                s.level.map(|level| SpendingAlert {
                    limit: s.limit,
                    spent: s.spent,
                    percent: s.percent,
                    level,
                })
            })
            .filter(|alert| !dismissed.contains(&alert.key()))
            .collect();
        alerts.sort_by(|a, b| b.level.cmp(&a.level).then(a.limit.category.cmp(&b.limit.category)));
        Ok(alerts)
    }

    /// Hide the alert for a category at its current tier
    ///
    /// Returns false when the category has no active alert.
    pub fn dismiss(
        &self,
        category: &str,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> BankResult<bool> {
        let wanted = category.trim().to_lowercase();
        let Some(alert) = self
            .alerts(today, thresholds)?
            .into_iter()
            .find(|a| a.limit.category.to_lowercase() == wanted)
        else {
            return Ok(false);
        };

        let key = alert.key();
        debug!(category = %key.category, level = %key.level, "dismissing alert");
        self.storage.alert_state.update(|state| {
            if !state.dismissed.contains(&key) {
                state.dismissed.push(key);
            }
        })?;
        Ok(true)
    }

    /// Hide every alert currently shown
    pub fn dismiss_all(&self, today: NaiveDate, thresholds: &AlertThresholds) -> BankResult<usize> {
        let keys: Vec<DismissedAlert> = self
            .alerts(today, thresholds)?
            .iter()
            .map(SpendingAlert::key)
            .collect();
        let count = keys.len();
        if count > 0 {
            self.storage
                .alert_state
                .update(|state| state.dismissed.extend(keys))?;
        }
        Ok(count)
    }

    fn persist_update(&self, before: &SpendingLimit, after: &SpendingLimit) -> BankResult<()> {
        self.storage.limits.upsert(after.clone())?;
        self.storage.limits.save()?;
        self.storage.log_update(
            EntityType::SpendingLimit,
            after.id.to_string(),
            Some(after.category.clone()),
            before,
            after,
        )?;
        self.reset_dismissed()
    }

    /// Any change to the set of limits makes every alert eligible again
    fn reset_dismissed(&self) -> BankResult<()> {
        if self.storage.alert_state.get()?.dismissed.is_empty() {
            return Ok(());
        }
        self.storage.alert_state.update(|state| state.dismissed.clear())
    }
}
