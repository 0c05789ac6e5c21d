//! Legacy import service
//!
//! Reads a JSON dump of the browser local storage the web demo kept its
//! state in and turns it into records. Each key holds an array, either as
//! plain JSON or as a JSON string containing the array. Field names are
//! camelCase and amounts are plain numbers in currency units.

use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{
    AccountId, AutoPayment, BillingCycle, Budget, Money, PaymentFrequency, PaymentTemplate,
    SpendingLimit, Subscription,
};
use crate::storage::Storage;

const KEY_LIMITS: &str = "spendingLimits";
const KEY_AUTO_PAYMENTS: &str = "autoPayments";
const KEY_TEMPLATES: &str = "payment_templates";
const KEY_BUDGETS: &str = "banking_budgets";
const KEY_SUBSCRIPTIONS: &str = "banking_subscriptions";

/// Amount as stored by the web demo: a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyAmount {
    Number(f64),
    Text(String),
}

impl LegacyAmount {
    fn to_money(&self) -> Option<Money> {
        match self {
            Self::Number(n) if n.is_finite() => Some(Money::from_units_f64(*n)),
            Self::Number(_) => None,
            Self::Text(s) => Money::parse(s).ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLimit {
    category: String,
    #[serde(alias = "amount")]
    limit: LegacyAmount,
    #[serde(default = "yes", alias = "isActive")]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBudget {
    category: String,
    #[serde(alias = "limit")]
    amount: LegacyAmount,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySubscription {
    name: String,
    amount: LegacyAmount,
    #[serde(default, alias = "billingCycle", alias = "period")]
    cycle: Option<String>,
    #[serde(default, alias = "nextDate", alias = "nextPayment")]
    next_billing_date: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default = "yes", alias = "isActive")]
    active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAutoPayment {
    name: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    category: Option<String>,
    amount: LegacyAmount,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default, alias = "nextDate")]
    next_payment_date: Option<String>,
    #[serde(default = "yes", alias = "isActive")]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTemplate {
    name: String,
    #[serde(default, alias = "phone", alias = "account")]
    recipient: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    amount: Option<LegacyAmount>,
}

fn yes() -> bool {
    true
}

/// Outcome of one import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub limits: usize,
    pub budgets: usize,
    pub subscriptions: usize,
    pub auto_payments: usize,
    pub templates: usize,
    /// Entries that were present but could not be understood
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn total(&self) -> usize {
        self.limits + self.budgets + self.subscriptions + self.auto_payments + self.templates
    }
}

/// Service for importing the web demo's local storage
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import a dump file from disk
    pub fn import_file(&self, path: &Path, today: NaiveDate) -> BankResult<ImportResult> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BankError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let dump: Value = serde_json::from_str(content.trim_start_matches('\u{feff}'))
            .map_err(|e| BankError::Import(format!("Invalid JSON in {}: {}", path.display(), e)))?;
        self.import_dump(&dump, today)
    }

    /// Import an already parsed dump object
    ///
    /// Limits and budgets replace existing entries of the same category;
    /// subscriptions, auto-payments and templates replace entries of the
    /// same name. Auto-payments are attached to the first account.
    pub fn import_dump(&self, dump: &Value, today: NaiveDate) -> BankResult<ImportResult> {
        let object = dump
            .as_object()
            .ok_or_else(|| BankError::Import("Dump must be a JSON object of storage keys".into()))?;

        let mut result = ImportResult::default();

        for key in object.keys() {
            if ![KEY_LIMITS, KEY_AUTO_PAYMENTS, KEY_TEMPLATES, KEY_BUDGETS, KEY_SUBSCRIPTIONS]
                .contains(&key.as_str())
            {
                debug!(key = key.as_str(), "ignoring unknown legacy key");
            }
        }

        for legacy in entries::<LegacyLimit>(object.get(KEY_LIMITS), KEY_LIMITS, &mut result)? {
            let Some(amount) = legacy.limit.to_money() else {
                result.skip(format!("limit '{}': unreadable amount", legacy.category));
                continue;
            };
            let mut limit = SpendingLimit::new(legacy.category.trim(), amount);
            limit.enabled = legacy.enabled;
            if let Err(e) = limit.validate() {
                result.skip(format!("limit '{}': {}", legacy.category, e));
                continue;
            }
            if let Some(existing) = self.storage.limits.find(|l| same(&l.category, &limit.category))? {
                limit.id = existing.id;
                limit.created_at = existing.created_at;
            }
            self.storage.limits.upsert(limit.clone())?;
            self.storage.log_create(
                EntityType::SpendingLimit,
                limit.id.to_string(),
                Some(limit.category.clone()),
                &limit,
            )?;
            result.limits += 1;
        }

        for legacy in entries::<LegacyBudget>(object.get(KEY_BUDGETS), KEY_BUDGETS, &mut result)? {
            let Some(amount) = legacy.amount.to_money() else {
                result.skip(format!("budget '{}': unreadable amount", legacy.category));
                continue;
            };
            let mut budget = Budget::new(legacy.category.trim(), amount);
            budget.color = legacy.color;
            if let Err(e) = budget.validate() {
                result.skip(format!("budget '{}': {}", legacy.category, e));
                continue;
            }
            if let Some(existing) = self.storage.budgets.find(|b| same(&b.category, &budget.category))? {
                budget.id = existing.id;
                budget.created_at = existing.created_at;
            }
            self.storage.budgets.upsert(budget.clone())?;
            self.storage.log_create(
                EntityType::Budget,
                budget.id.to_string(),
                Some(budget.category.clone()),
                &budget,
            )?;
            result.budgets += 1;
        }

        for legacy in entries::<LegacySubscription>(
            object.get(KEY_SUBSCRIPTIONS),
            KEY_SUBSCRIPTIONS,
            &mut result,
        )? {
            let Some(amount) = legacy.amount.to_money() else {
                result.skip(format!("subscription '{}': unreadable amount", legacy.name));
                continue;
            };
            let cycle = legacy
                .cycle
                .as_deref()
                .and_then(BillingCycle::parse)
                .unwrap_or_default();
            let next = parse_legacy_date(legacy.next_billing_date.as_deref()).unwrap_or(today);
            let mut sub = Subscription::new(legacy.name.trim(), amount, cycle, next);
            if let Some(category) = legacy.category.filter(|c| !c.trim().is_empty()) {
                sub.category = category;
            }
            sub.active = legacy.active;
            if let Err(e) = sub.validate() {
                result.skip(format!("subscription '{}': {}", legacy.name, e));
                continue;
            }
            if let Some(existing) = self.storage.subscriptions.find(|s| same(&s.name, &sub.name))? {
                sub.id = existing.id;
                sub.created_at = existing.created_at;
            }
            self.storage.subscriptions.upsert(sub.clone())?;
            self.storage.log_create(
                EntityType::Subscription,
                sub.id.to_string(),
                Some(sub.name.clone()),
                &sub,
            )?;
            result.subscriptions += 1;
        }

        let auto_payments = entries::<LegacyAutoPayment>(
            object.get(KEY_AUTO_PAYMENTS),
            KEY_AUTO_PAYMENTS,
            &mut result,
        )?;
        if !auto_payments.is_empty() {
            match self.default_account()? {
                Some(account_id) => {
                    for legacy in auto_payments {
                        if self.import_auto_payment(legacy, account_id, today, &mut result)? {
                            result.auto_payments += 1;
                        }
                    }
                }
                None => {
                    for legacy in auto_payments {
                        result.skip(format!("auto-payment '{}': no account to pay from", legacy.name));
                    }
                }
            }
        }

        for legacy in entries::<LegacyTemplate>(object.get(KEY_TEMPLATES), KEY_TEMPLATES, &mut result)? {
            let category = legacy.category.unwrap_or_else(|| "Payments".to_string());
            let mut template = PaymentTemplate::new(legacy.name.trim(), category);
            template.recipient = legacy.recipient.unwrap_or_default();
            template.amount = legacy.amount.as_ref().and_then(LegacyAmount::to_money);
            if let Err(e) = template.validate() {
                result.skip(format!("template '{}': {}", legacy.name, e));
                continue;
            }
            if let Some(existing) = self.storage.templates.find(|t| same(&t.name, &template.name))? {
                template.id = existing.id;
                template.created_at = existing.created_at;
            }
            self.storage.templates.upsert(template.clone())?;
            self.storage.log_create(
                EntityType::PaymentTemplate,
                template.id.to_string(),
                Some(template.name.clone()),
                &template,
            )?;
            result.templates += 1;
        }

        self.storage.limits.save()?;
        self.storage.budgets.save()?;
        self.storage.subscriptions.save()?;
        self.storage.auto_payments.save()?;
        self.storage.templates.save()?;

        info!(
            imported = result.total(),
            skipped = result.skipped,
            "legacy import finished"
        );
        Ok(result)
    }

    fn import_auto_payment(
        &self,
        legacy: LegacyAutoPayment,
        account_id: AccountId,
        today: NaiveDate,
        result: &mut ImportResult,
    ) -> BankResult<bool> {
        let Some(amount) = legacy.amount.to_money() else {
            result.skip(format!("auto-payment '{}': unreadable amount", legacy.name));
            return Ok(false);
        };
        let frequency = legacy
            .frequency
            .as_deref()
            .and_then(PaymentFrequency::parse)
            .unwrap_or(PaymentFrequency::Monthly);
        let next = parse_legacy_date(legacy.next_payment_date.as_deref()).unwrap_or(today);
        let category = legacy.category.unwrap_or_else(|| "Utilities".to_string());

        let mut payment =
            AutoPayment::new(legacy.name.trim(), category, amount, account_id, frequency, next);
        payment.provider = legacy.provider.unwrap_or_default();
        payment.enabled = legacy.enabled;
        if let Err(e) = payment.validate() {
            result.skip(format!("auto-payment '{}': {}", legacy.name, e));
            return Ok(false);
        }
        if let Some(existing) = self.storage.auto_payments.find(|p| same(&p.name, &payment.name))? {
            payment.id = existing.id;
            payment.account_id = existing.account_id;
            payment.created_at = existing.created_at;
        }
        self.storage.auto_payments.upsert(payment.clone())?;
        self.storage.log_create(
            EntityType::AutoPayment,
            payment.id.to_string(),
            Some(payment.name.clone()),
            &payment,
        )?;
        Ok(true)
    }

    fn default_account(&self) -> BankResult<Option<AccountId>> {
        Ok(self.storage.accounts.get_sorted()?.first().map(|a| a.id))
    }
}

impl ImportResult {
    fn skip(&mut self, reason: String) {
        warn!(%reason, "skipping legacy entry");
        self.skipped += 1;
        self.warnings.push(reason);
    }
}

/// Decode the array stored under one key, tolerating string-wrapped JSON
///
/// Entries that fail to decode are counted as skipped rather than failing the
/// whole import.
fn entries<T: DeserializeOwned>(
    raw: Option<&Value>,
    key: &str,
    result: &mut ImportResult,
) -> BankResult<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let value = match raw {
        Value::String(s) => serde_json::from_str::<Value>(s)
            .map_err(|e| BankError::Import(format!("'{}' holds invalid JSON: {}", key, e)))?,
        Value::Null => return Ok(Vec::new()),
        other => other.clone(),
    };

    let Value::Array(items) = value else {
        return Err(BankError::Import(format!("'{}' is not an array", key)));
    };

    let mut decoded = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(entry) => decoded.push(entry),
            Err(e) => result.skip(format!("{}[{}]: {}", key, index, e)),
        }
    }
    Ok(decoded)
}

/// ISO dates, optionally with a time part, or the demo's dd.mm.yyyy
fn parse_legacy_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d.%m.%Y"))
        .ok()
}

fn same(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
