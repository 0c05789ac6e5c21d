//! Deposit model
//!
//! A fixed-term deposit opened from a funding account.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, DepositId};
use super::money::Money;
use super::period::{add_months, months_ago};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub name: String,
    pub principal: Money,
    /// Annual rate in percent
    pub rate: f64,
    pub term_months: u32,
    pub opened_on: NaiveDate,
    pub funding_account_id: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Deposit {
    pub fn new(
        name: impl Into<String>,
        principal: Money,
        rate: f64,
        term_months: u32,
        opened_on: NaiveDate,
        funding_account_id: AccountId,
    ) -> Self {
        Self {
            id: DepositId::new(),
            name: name.into(),
            principal,
            rate,
            term_months,
            opened_on,
            funding_account_id,
            created_at: Utc::now(),
        }
    }

    pub fn maturity_date(&self) -> NaiveDate {
        add_months(self.opened_on, self.term_months)
    }

    /// Calendar months elapsed since opening, capped at the term
    pub fn elapsed_months(&self, today: NaiveDate) -> u32 {
        months_ago(self.opened_on, today).min(self.term_months)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Deposit name cannot be empty".into());
        }
        if !self.principal.is_positive() {
            return Err(format!("Deposit amount must be positive, got {}", self.principal));
        }
        if !(0.0..=100.0).contains(&self.rate) {
            return Err(format!("Deposit rate must be between 0 and 100, got {}", self.rate));
        }
        if self.term_months == 0 {
            return Err("Deposit term must be at least one month".into());
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
    fn test_elapsed_is_capped() {
        let deposit = Deposit::new("Reserve", Money::from_units(100_000), 12.0, 6, d(2026, 1, 20), AccountId::new());
        assert_eq!(deposit.elapsed_months(d(2026, 3, 1)), 2);
        assert_eq!(deposit.elapsed_months(d(2027, 3, 1)), 6);
        assert_eq!(deposit.maturity_date(), d(2026, 7, 20));
    }

    #[test]
    fn test_validate_term() {
        let deposit = Deposit::new("X", Money::from_units(1), 5.0, 0, d(2026, 1, 1), AccountId::new());
        assert!(deposit.validate().is_err());
    }
}
