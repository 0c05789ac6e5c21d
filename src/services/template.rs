//! Payment template service
//!
//! Saved payment presets. Using a template turns it into a ledger payment,
//! with the amount and account taken from the template unless overridden.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{AccountId, Money, PaymentTemplate, TemplateId};
use crate::storage::Storage;

use super::ledger::{LedgerAction, LedgerOutcome, LedgerService};

/// Optional changes to a template
#[derive(Debug, Clone, Default)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub recipient: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub account_id: Option<AccountId>,
}

pub struct TemplateService<'a> {
    storage: &'a Storage,
}

impl<'a> TemplateService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        name: &str,
        category: &str,
        recipient: Option<&str>,
        amount: Option<Money>,
        account_id: Option<AccountId>,
    ) -> BankResult<PaymentTemplate> {
        if self.find(name)?.is_some() {
            return Err(BankError::Duplicate {
                entity_type: "Payment template",
                identifier: name.trim().to_string(),
            });
        }
        if let Some(account_id) = account_id {
            self.storage.accounts.require(account_id)?;
        }

        let mut template = PaymentTemplate::new(name.trim(), category.trim());
        template.recipient = recipient.unwrap_or_default().trim().to_string();
        template.amount = amount;
        template.account_id = account_id;
        template.validate().map_err(BankError::Validation)?;

        self.storage.templates.upsert(template.clone())?;
        self.storage.templates.save()?;
        self.storage.log_create(
            EntityType::PaymentTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        info!(name = %template.name, "payment template saved");
        Ok(template)
    }

    /// Find by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<PaymentTemplate>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .templates
            .find(|t| t.name.to_lowercase() == wanted || t.id.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> BankResult<PaymentTemplate> {
        self.find(identifier)?
            .ok_or_else(|| BankError::template_not_found(identifier))
    }

    pub fn list(&self) -> BankResult<Vec<PaymentTemplate>> {
        let mut templates = self.storage.templates.get_all()?;
        templates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(templates)
    }

    pub fn update(&self, id: TemplateId, changes: TemplateUpdate) -> BankResult<PaymentTemplate> {
        let mut template = self.storage.templates.require(id)?;
        let before = template.clone();

        if let Some(name) = changes.name {
            if self.find(&name)?.is_some_and(|other| other.id != id) {
                return Err(BankError::Duplicate {
                    entity_type: "Payment template",
                    identifier: name.trim().to_string(),
                });
            }
            template.name = name.trim().to_string();
        }
        if let Some(recipient) = changes.recipient {
            template.recipient = recipient.trim().to_string();
        }
        if let Some(category) = changes.category {
            template.category = category.trim().to_string();
        }
        if changes.amount.is_some() {
            template.amount = changes.amount;
        }
        if let Some(account_id) = changes.account_id {
            self.storage.accounts.require(account_id)?;
            template.account_id = Some(account_id);
        }
        template.validate().map_err(BankError::Validation)?;
        template.updated_at = Utc::now();

        self.storage.templates.upsert(template.clone())?;
        self.storage.templates.save()?;
        self.storage.log_update(
            EntityType::PaymentTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;
        Ok(template)
    }

    pub fn delete(&self, id: TemplateId) -> BankResult<PaymentTemplate> {
        let template = self
            .storage
            .templates
            .delete(id)?
            .ok_or_else(|| BankError::template_not_found(id.to_string()))?;
        self.storage.templates.save()?;
        self.storage.log_delete(
            EntityType::PaymentTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;
        Ok(template)
    }

    /// The payment a template describes, with optional overrides
    pub fn to_action(
        &self,
        template: &PaymentTemplate,
        amount: Option<Money>,
        account_id: Option<AccountId>,
        date: NaiveDate,
    ) -> BankResult<LedgerAction> {
        let amount = amount.or(template.amount).ok_or_else(|| {
            BankError::Validation(format!(
                "Template '{}' has no amount; pass one explicitly",
                template.name
            ))
        })?;
        let from = account_id.or(template.account_id).ok_or_else(|| {
            BankError::Validation(format!(
                "Template '{}' has no account; pass one explicitly",
                template.name
            ))
        })?;

        Ok(LedgerAction::Payment {
            from,
            amount,
            name: template.payment_name(),
            category: template.category.clone(),
            date,
        })
    }

    /// Pay using a template
    pub fn use_template(
        &self,
        id: TemplateId,
        amount: Option<Money>,
        account_id: Option<AccountId>,
        date: NaiveDate,
    ) -> BankResult<LedgerOutcome> {
        let template = self.storage.templates.require(id)?;
        let action = self.to_action(&template, amount, account_id, date)?;
        LedgerService::new(self.storage).apply(action)
    }
}
