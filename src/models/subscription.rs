//! Subscription model
//!
//! Recurring charges the user tracks (streaming, cloud storage, gym).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SubscriptionId;
use super::money::Money;
use super::period::add_months_on_day;

/// How often a subscription bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annual" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The date one cycle after `date`, on `billing_day` for month-based cycles
    pub fn advance(&self, date: NaiveDate, billing_day: u32) -> NaiveDate {
        match self {
            Self::Weekly => date + Duration::days(7),
            Self::Monthly => add_months_on_day(date, 1, billing_day),
            Self::Yearly => add_months_on_day(date, 12, billing_day),
        }
    }

    /// Convert a per-cycle amount to its monthly equivalent
    pub fn monthly_equivalent(&self, amount: Money) -> Money {
        match self {
            Self::Weekly => Money::from_minor((amount.minor() as f64 * 52.0 / 12.0).round() as i64),
            Self::Monthly => amount,
            Self::Yearly => Money::from_minor((amount.minor() as f64 / 12.0).round() as i64),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A tracked recurring subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub amount: Money,
    pub cycle: BillingCycle,
    pub next_billing_date: NaiveDate,
    /// Day of month the subscription bills on; absent in older files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_day: Option<u32>,
    #[serde(default)]
    pub category: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        cycle: BillingCycle,
        next_billing_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            name: name.into(),
            amount,
            cycle,
            next_billing_date,
            billing_day: Some(next_billing_date.day()),
            category: "Subscriptions".to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Monthly cost of this subscription
    pub fn monthly_cost(&self) -> Money {
        self.cycle.monthly_equivalent(self.amount)
    }

    /// Set a new next billing date, which also sets the billing day
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.next_billing_date = date;
        self.billing_day = Some(date.day());
    }

    /// Move the billing date forward until it is after `today`
    ///
    /// Returns how many cycles were skipped.
    pub fn roll_forward(&mut self, today: NaiveDate) -> u32 {
        let billing_day = self.billing_day.unwrap_or_else(|| self.next_billing_date.day());
        let mut cycles = 0;
        while self.next_billing_date <= today {
            self.next_billing_date = self.cycle.advance(self.next_billing_date, billing_day);
            cycles += 1;
        }
        if cycles > 0 {
            self.updated_at = Utc::now();
        }
        cycles
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Subscription name cannot be empty".into());
        }
        if !self.amount.is_positive() {
            return Err(format!("Subscription amount must be positive, got {}", self.amount));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_equivalent() {
        assert_eq!(
            BillingCycle::Yearly.monthly_equivalent(Money::from_units(1200)),
            Money::from_units(100)
        );
        assert_eq!(
            BillingCycle::Weekly.monthly_equivalent(Money::from_units(300)),
            Money::from_units(1300)
        );
        assert_eq!(
            BillingCycle::Monthly.monthly_equivalent(Money::from_units(299)),
            Money::from_units(299)
        );
    }

    #[test]
    fn test_roll_forward() {
        let mut sub = Subscription::new("Music", Money::from_units(199), BillingCycle::Monthly, d(2026, 8, 31));
        let skipped = sub.roll_forward(d(2026, 10, 17));
        assert_eq!(skipped, 2);
        assert_eq!(sub.next_billing_date, d(2026, 10, 31));

        let skipped = sub.roll_forward(d(2026, 10, 17));
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_yearly_leap_day_returns_in_leap_years() {
        let mut sub = Subscription::new("Cloud", Money::from_units(999), BillingCycle::Yearly, d(2028, 2, 29));
        sub.roll_forward(d(2028, 3, 1));
        assert_eq!(sub.next_billing_date, d(2029, 2, 28));
        sub.roll_forward(d(2031, 3, 1));
        assert_eq!(sub.next_billing_date, d(2032, 2, 29));
    }

    #[test]
    fn test_validate() {
        let sub = Subscription::new("", Money::from_units(1), BillingCycle::Weekly, d(2026, 1, 1));
        assert!(sub.validate().is_err());
    }
}
