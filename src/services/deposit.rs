//! Deposit service
//!
//! Previews simple-interest income and opens deposits funded from an
//! account through a ledger payment.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::calc::deposit::{simple_interest, value_at_maturity};
use crate::error::{BankError, BankResult};
use crate::models::{AccountId, Deposit, DepositId, Money};
use crate::storage::Storage;

use super::ledger::{LedgerAction, LedgerService};

/// Category used for the funding payment
pub const DEPOSIT_CATEGORY: &str = "Deposits";

/// Expected income for a prospective deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositQuote {
    pub amount: Money,
    pub interest: Money,
    pub total: Money,
}

/// An opened deposit with its figures as of a given day
#[derive(Debug, Clone)]
pub struct DepositSummary {
    pub deposit: Deposit,
    pub elapsed_months: u32,
    pub accrued: Money,
    pub expected_interest: Money,
    pub maturity_date: NaiveDate,
    pub matured: bool,
}

pub struct DepositService<'a> {
    storage: &'a Storage,
}

impl<'a> DepositService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Expected income without opening anything
    pub fn quote(amount: Money, rate: f64, months: u32) -> BankResult<DepositQuote> {
        if !amount.is_positive() {
            return Err(BankError::Validation(format!(
                "Deposit amount must be positive, got {}",
                amount
            )));
        }
        if !(0.0..=100.0).contains(&rate) || !rate.is_finite() {
            return Err(BankError::Validation(format!(
                "Deposit rate must be between 0 and 100, got {}",
                rate
            )));
        }
        if months == 0 {
            return Err(BankError::Validation(
                "Deposit term must be at least one month".into(),
            ));
        }
        Ok(DepositQuote {
            amount,
            interest: simple_interest(amount, rate, months),
            total: value_at_maturity(amount, rate, months),
        })
    }

    /// Open a deposit, moving the principal out of the funding account
    pub fn open(
        &self,
        name: &str,
        amount: Money,
        rate: f64,
        term_months: u32,
        funding_account_id: AccountId,
        today: NaiveDate,
    ) -> BankResult<Deposit> {
        let deposit = Deposit::new(name.trim(), amount, rate, term_months, today, funding_account_id);
        deposit.validate().map_err(BankError::Validation)?;

        LedgerService::new(self.storage).apply(LedgerAction::Payment {
            from: funding_account_id,
            amount,
            name: format!("Deposit \"{}\"", deposit.name),
            category: DEPOSIT_CATEGORY.to_string(),
            date: today,
        })?;

        self.storage.deposits.upsert(deposit.clone())?;
        self.storage.deposits.save()?;
        self.storage.log_create(
            EntityType::Deposit,
            deposit.id.to_string(),
            Some(deposit.name.clone()),
            &deposit,
        )?;

        info!(name = %deposit.name, amount = %amount, rate, term_months, "deposit opened");
        Ok(deposit)
    }

    pub fn find(&self, identifier: &str) -> BankResult<Option<Deposit>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .deposits
            .find(|d| d.name.to_lowercase() == wanted || d.id.matches(identifier))
    }

    pub fn get(&self, id: DepositId) -> BankResult<Deposit> {
        self.storage.deposits.require(id)
    }

    pub fn summarize(deposit: Deposit, today: NaiveDate) -> DepositSummary {
        let elapsed_months = deposit.elapsed_months(today);
        let maturity_date = deposit.maturity_date();
        DepositSummary {
            accrued: simple_interest(deposit.principal, deposit.rate, elapsed_months),
            expected_interest: simple_interest(deposit.principal, deposit.rate, deposit.term_months),
            matured: today >= maturity_date,
            elapsed_months,
            maturity_date,
            deposit,
        }
    }

    /// Every deposit with accrued interest as of `today`
    pub fn list(&self, today: NaiveDate) -> BankResult<Vec<DepositSummary>> {
        let mut deposits = self.storage.deposits.get_all()?;
        deposits.sort_by_key(|d| d.opened_on);
        Ok(deposits
            .into_iter()
            .map(|d| Self::summarize(d, today))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind};
    use crate::storage::test_support::create_test_storage;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_quote() {
        let quote = DepositService::quote(Money::from_units(500_000), 15.0, 12).unwrap();
        assert_eq!(quote.interest, Money::from_units(75_000));
        assert_eq!(quote.total, Money::from_units(575_000));

        let half = DepositService::quote(Money::from_units(500_000), 15.0, 6).unwrap();
        assert_eq!(half.interest, Money::from_units(37_500));

        assert!(DepositService::quote(Money::zero(), 15.0, 6).is_err());
        assert!(DepositService::quote(Money::from_units(1), 150.0, 6).is_err());
        assert!(DepositService::quote(Money::from_units(1), 15.0, 0).is_err());
    }

    #[test]
    fn test_open_debits_funding_account() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::with_balance("Savings", AccountKind::Savings, Money::from_units(600_000));
        let account_id = account.id;
        storage.accounts.upsert(account).unwrap();
        let service = DepositService::new(&storage);

        let deposit = service
            .open("Reliable", Money::from_units(500_000), 15.0, 12, account_id, d(2026, 4, 10))
            .unwrap();

        assert_eq!(
            storage.accounts.require(account_id).unwrap().balance,
            Money::from_units(100_000)
        );
        let txns = storage.transactions.get_all().unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, DEPOSIT_CATEGORY);

        let summaries = service.list(d(2026, 10, 17)).unwrap();
        assert_eq!(summaries[0].deposit.id, deposit.id);
        assert_eq!(summaries[0].elapsed_months, 6);
        assert_eq!(summaries[0].accrued, Money::from_units(37_500));
        assert!(!summaries[0].matured);
    }

    #[test]
    fn test_open_without_funds_creates_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::with_balance("Card", AccountKind::Card, Money::from_units(10));
        let account_id = account.id;
        storage.accounts.upsert(account).unwrap();
        let service = DepositService::new(&storage);

        let err = service
            .open("Big", Money::from_units(1_000), 10.0, 6, account_id, d(2026, 10, 17))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(storage.deposits.count().unwrap(), 0);
    }

    #[test]
    fn test_accrual_caps_at_term() {
        let deposit = Deposit::new("Short", Money::from_units(120_000), 10.0, 3, d(2026, 1, 5), AccountId::new());
        let summary = DepositService::summarize(deposit, d(2026, 10, 17));
        assert_eq!(summary.elapsed_months, 3);
        assert_eq!(summary.accrued, summary.expected_interest);
        assert_eq!(summary.accrued, Money::from_units(3_000));
        assert!(summary.matured);
    }
}
