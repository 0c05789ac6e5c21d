//! Auto-payment and payment template models
//!
//! Auto-payments are recurring bill payments executed from a funding account;
//! templates are reusable payment presets applied on demand.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, AutoPaymentId, TemplateId};
use super::money::Money;
use super::period::add_months_on_day;

/// How often an auto-payment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PaymentFrequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            "yearly" | "year" | "annual" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The date one period after `date`
    ///
    /// Month-based frequencies land on `billing_day`, clamped to the length
    /// of the target month.
    pub fn advance(&self, date: NaiveDate, billing_day: u32) -> NaiveDate {
        match self {
            Self::Weekly => date + Duration::days(7),
            Self::Monthly => add_months_on_day(date, 1, billing_day),
            Self::Quarterly => add_months_on_day(date, 3, billing_day),
            Self::Yearly => add_months_on_day(date, 12, billing_day),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A recurring bill payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPayment {
    pub id: AutoPaymentId,
    pub name: String,
    /// Utility, carrier or merchant being paid
    #[serde(default)]
    pub provider: String,
    pub category: String,
    pub amount: Money,
    pub account_id: AccountId,
    pub frequency: PaymentFrequency,
    pub next_payment_date: NaiveDate,
    /// Day of month the schedule was set up on; absent in older files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_day: Option<u32>,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AutoPayment {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        account_id: AccountId,
        frequency: PaymentFrequency,
        next_payment_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AutoPaymentId::new(),
            name: name.into(),
            provider: String::new(),
            category: category.into(),
            amount,
            account_id,
            frequency,
            next_payment_date,
            billing_day: Some(next_payment_date.day()),
            enabled: true,
            last_run: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this auto-payment should run on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.enabled && self.next_payment_date <= today
    }

    /// Move the schedule to a new next date, which also sets the billing day
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.next_payment_date = date;
        self.billing_day = Some(date.day());
    }

    /// Record a successful run and schedule the next one after `today`
    pub fn mark_paid(&mut self, today: NaiveDate) {
        let billing_day = self.billing_day.unwrap_or_else(|| self.next_payment_date.day());
        self.last_run = Some(today);
        while self.next_payment_date <= today {
            self.next_payment_date = self.frequency.advance(self.next_payment_date, billing_day);
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Auto-payment name cannot be empty".into());
        }
        if !self.amount.is_positive() {
            return Err(format!("Auto-payment amount must be positive, got {}", self.amount));
        }
        Ok(())
    }
}

/// A reusable payment preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTemplate {
    pub id: TemplateId,
    pub name: String,
    /// Phone number, contract number or merchant the payment goes to
    #[serde(default)]
    pub recipient: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentTemplate {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        let category = category.into();
        Self {
            id: TemplateId::new(),
            name: name.into(),
            recipient: String::new(),
            icon: super::transaction::icon_for_category(&category).to_string(),
            category,
            amount: None,
            account_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name used for the transaction a template produces
    pub fn payment_name(&self) -> String {
        if self.recipient.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.recipient)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Template name cannot be empty".into());
        }
        if let Some(amount) = self.amount {
            if !amount.is_positive() {
                return Err(format!("Template amount must be positive, got {}", amount));
            }
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
    fn test_due_and_mark_paid() {
        let mut payment = AutoPayment::new(
            "Internet",
            "Utilities",
            Money::from_units(650),
            AccountId::new(),
            PaymentFrequency::Monthly,
            d(2026, 10, 5),
        );
        assert!(payment.is_due(d(2026, 10, 5)));
        assert!(!payment.is_due(d(2026, 10, 4)));

        payment.mark_paid(d(2026, 10, 17));
        assert_eq!(payment.next_payment_date, d(2026, 11, 5));
        assert_eq!(payment.last_run, Some(d(2026, 10, 17)));

        payment.enabled = false;
        assert!(!payment.is_due(d(2026, 12, 1)));
    }

    #[test]
    fn test_quarterly_advance() {
        assert_eq!(PaymentFrequency::Quarterly.advance(d(2026, 11, 30), 30), d(2027, 2, 28));
        assert_eq!(PaymentFrequency::Quarterly.advance(d(2027, 2, 28), 30), d(2027, 5, 30));
        assert_eq!(PaymentFrequency::Weekly.advance(d(2026, 12, 29), 29), d(2027, 1, 5));
    }

    #[test]
    fn test_month_end_schedule_keeps_its_day() {
        let mut payment = AutoPayment::new(
            "Rent",
            "Housing",
            Money::from_units(30_000),
            AccountId::new(),
            PaymentFrequency::Monthly,
            d(2026, 1, 31),
        );

        let mut dates = Vec::new();
        for today in [d(2026, 1, 31), d(2026, 2, 28), d(2026, 3, 31)] {
            payment.mark_paid(today);
            dates.push(payment.next_payment_date);
        }
        assert_eq!(dates, vec![d(2026, 2, 28), d(2026, 3, 31), d(2026, 4, 30)]);
    }

    #[test]
    fn test_missing_billing_day_falls_back_to_next_date() {
        let mut payment = AutoPayment::new(
            "Internet",
            "Utilities",
            Money::from_units(650),
            AccountId::new(),
            PaymentFrequency::Monthly,
            d(2026, 3, 31),
        );
        payment.billing_day = None;
        payment.mark_paid(d(2026, 3, 31));
        assert_eq!(payment.next_payment_date, d(2026, 4, 30));

        payment.reschedule(d(2026, 5, 31));
        assert_eq!(payment.billing_day, Some(31));
    }

    #[test]
    fn test_template_payment_name() {
        let mut template = PaymentTemplate::new("Mobile", "Mobile");
        assert_eq!(template.payment_name(), "Mobile");
        template.recipient = "+7 900 000-00-00".into();
        assert_eq!(template.payment_name(), "Mobile (+7 900 000-00-00)");
    }
}
