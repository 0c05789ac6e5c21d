//! Subscription service

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{BillingCycle, Money, Subscription, SubscriptionId};
use crate::storage::Storage;

/// Optional changes to a subscription
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub cycle: Option<BillingCycle>,
    pub next_billing_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// A charge expected within the upcoming window
#[derive(Debug, Clone)]
pub struct UpcomingCharge {
    pub subscription: Subscription,
    pub date: NaiveDate,
    pub days_left: i64,
}

pub struct SubscriptionService<'a> {
    storage: &'a Storage,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        name: &str,
        amount: Money,
        cycle: BillingCycle,
        next_billing_date: NaiveDate,
        category: Option<&str>,
    ) -> BankResult<Subscription> {
        let mut sub = Subscription::new(name.trim(), amount, cycle, next_billing_date);
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            sub.category = category.to_string();
        }
        sub.validate().map_err(BankError::Validation)?;

        self.storage.subscriptions.upsert(sub.clone())?;
        self.storage.subscriptions.save()?;
        self.storage.log_create(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &sub,
        )?;

        info!(name = %sub.name, amount = %sub.amount, "subscription added");
        Ok(sub)
    }

    /// Find by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<Subscription>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .subscriptions
            .find(|s| s.name.to_lowercase() == wanted || s.id.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> BankResult<Subscription> {
        self.find(identifier)?
            .ok_or_else(|| BankError::subscription_not_found(identifier))
    }

    /// All subscriptions ordered by next billing date
    pub fn list(&self) -> BankResult<Vec<Subscription>> {
        let mut subs = self.storage.subscriptions.get_all()?;
        subs.sort_by_key(|s| s.next_billing_date);
        Ok(subs)
    }

    pub fn update(&self, id: SubscriptionId, changes: SubscriptionUpdate) -> BankResult<Subscription> {
        let mut sub = self.storage.subscriptions.require(id)?;
        let before = sub.clone();

        if let Some(name) = changes.name {
            sub.name = name.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            sub.amount = amount;
        }
        if let Some(cycle) = changes.cycle {
            sub.cycle = cycle;
        }
        if let Some(date) = changes.next_billing_date {
            sub.reschedule(date);
        }
        if let Some(category) = changes.category {
            sub.category = category.trim().to_string();
        }
        sub.validate().map_err(BankError::Validation)?;
        sub.updated_at = Utc::now();

        self.persist_update(&before, &sub)?;
        Ok(sub)
    }

    /// Pause or resume a subscription
    pub fn toggle(&self, id: SubscriptionId) -> BankResult<Subscription> {
        let mut sub = self.storage.subscriptions.require(id)?;
        let before = sub.clone();
        sub.active = !sub.active;
        sub.updated_at = Utc::now();
        self.persist_update(&before, &sub)?;
        Ok(sub)
    }

    pub fn delete(&self, id: SubscriptionId) -> BankResult<Subscription> {
        let sub = self
            .storage
            .subscriptions
            .delete(id)?
            .ok_or_else(|| BankError::subscription_not_found(id.to_string()))?;
        self.storage.subscriptions.save()?;
        self.storage.log_delete(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &sub,
        )?;
        Ok(sub)
    }

    /// Combined monthly cost of active subscriptions
    pub fn total_monthly(&self) -> BankResult<Money> {
        Ok(self
            .storage
            .subscriptions
            .filter(|s| s.active)?
            .iter()
            .map(Subscription::monthly_cost)
            .sum())
    }

    /// Active subscriptions billing within `days` of `today`, soonest first
    ///
    /// Overdue dates count as due today.
    pub fn upcoming(&self, today: NaiveDate, days: u32) -> BankResult<Vec<UpcomingCharge>> {
        let horizon = today + Duration::days(days as i64);
        let mut upcoming: Vec<UpcomingCharge> = self
            .storage
            .subscriptions
            .filter(|s| s.active && s.next_billing_date <= horizon)?
            .into_iter()
            .map(|subscription| {
                let date = subscription.next_billing_date.max(today);
                UpcomingCharge {
                    days_left: (date - today).num_days(),
                    date,
                    subscription,
                }
            })
            .collect();
        upcoming.sort_by_key(|c| c.date);
        Ok(upcoming)
    }

    /// Advance every billing date that is not after `today`
    ///
    /// Returns the subscriptions that moved.
    pub fn roll_forward(&self, today: NaiveDate) -> BankResult<Vec<Subscription>> {
        let mut moved = Vec::new();
        for mut sub in self.storage.subscriptions.get_all()? {
            let before = sub.clone();
            if sub.roll_forward(today) > 0 {
                self.storage.subscriptions.upsert(sub.clone())?;
                self.storage.log_update(
                    EntityType::Subscription,
                    sub.id.to_string(),
                    Some(sub.name.clone()),
                    &before,
                    &sub,
                )?;
                moved.push(sub);
            }
        }
        if !moved.is_empty() {
            self.storage.subscriptions.save()?;
            info!(count = moved.len(), "billing dates rolled forward");
        }
        Ok(moved)
    }

    fn persist_update(&self, before: &Subscription, after: &Subscription) -> BankResult<()> {
        self.storage.subscriptions.upsert(after.clone())?;
        self.storage.subscriptions.save()?;
        self.storage.log_update(
            EntityType::Subscription,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
        )
    }
}
