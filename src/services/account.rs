//! Account service
//!
//! Account lookup, creation and the balance overview. Balances themselves
//! only change through ledger actions.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountId, AccountKind, Money};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// Totals across all accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceOverview {
    /// Sum of positive balances on card, savings and investment accounts
    pub assets: Money,
    /// Outstanding credit-card debt, as a positive amount
    pub debt: Money,
    /// Assets minus debt
    pub net_worth: Money,
    pub account_count: usize,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Open a new account with an opening balance
    pub fn create(
        &self,
        name: &str,
        kind: AccountKind,
        opening_balance: Money,
        credit_limit: Option<Money>,
    ) -> BankResult<Account> {
        let name = name.trim();
        if self.storage.accounts.name_exists(name, None)? {
            return Err(BankError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::with_balance(name, kind, opening_balance);
        account.credit_limit = credit_limit;
        account.sort_order = self.storage.accounts.count()? as i32;
        account
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;
        if !kind.is_credit() && opening_balance.is_negative() {
            return Err(BankError::Validation(
                "Only credit accounts can open with a negative balance".into(),
            ));
        }

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;
        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        info!(account = %account.name, kind = %account.kind, "account created");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> BankResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }
        self.storage.accounts.find(|a| a.id.matches(identifier))
    }

    /// Like `find`, but a missing account is an error
    pub fn resolve(&self, identifier: &str) -> BankResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| BankError::account_not_found(identifier))
    }

    /// All accounts in display order
    pub fn list(&self) -> BankResult<Vec<Account>> {
        self.storage.accounts.get_sorted()
    }

    /// Rename an account or change its rate
    pub fn update(
        &self,
        id: AccountId,
        name: Option<&str>,
        rate: Option<f64>,
    ) -> BankResult<Account> {
        let mut account = self.storage.accounts.require(id)?;
        let before = account.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if self.storage.accounts.name_exists(new_name, Some(id))? {
                return Err(BankError::Duplicate {
                    entity_type: "Account",
                    identifier: new_name.to_string(),
                });
            }
            account.name = new_name.to_string();
        }
        if rate.is_some() {
            account.rate = rate;
        }
        account
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;
        account.updated_at = chrono::Utc::now();

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;
        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;
        Ok(account)
    }

    /// Assets, debt and net worth across every account
    pub fn overview(&self) -> BankResult<BalanceOverview> {
        let accounts = self.storage.accounts.get_all()?;
        let mut overview = BalanceOverview {
            account_count: accounts.len(),
            ..Default::default()
        };
        for account in &accounts {
            if account.balance.is_negative() {
                overview.debt += account.balance.abs();
            } else {
                overview.assets += account.balance;
            }
        }
        overview.net_worth = overview.assets - overview.debt;
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::create_test_storage;

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create("Main card", AccountKind::Card, Money::from_units(1000), None)
            .unwrap();

        assert_eq!(service.resolve("main card").unwrap().id, account.id);
        assert_eq!(service.resolve(&account.id.short()).unwrap().id, account.id);
        assert!(service.resolve("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Savings", AccountKind::Savings, Money::zero(), None)
            .unwrap();
        let err = service
            .create("savings", AccountKind::Savings, Money::zero(), None)
            .unwrap_err();
        assert!(matches!(err, BankError::Duplicate { .. }));
    }

    #[test]
    fn test_negative_opening_balance_only_for_credit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        assert!(service
            .create("Card", AccountKind::Card, Money::from_units(-5), None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(
                "Credit",
                AccountKind::Credit,
                Money::from_units(-5),
                Some(Money::from_units(100))
            )
            .is_ok());
    }

    #[test]
    fn test_update_rate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Savings", AccountKind::Savings, Money::zero(), None)
            .unwrap();

        let updated = service.update(account.id, Some("Rainy day"), Some(12.5)).unwrap();
        assert_eq!(updated.name, "Rainy day");
        assert_eq!(updated.rate, Some(12.5));
        assert!(service.update(account.id, None, Some(250.0)).is_err());
    }

    #[test]
    fn test_overview() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Card", AccountKind::Card, Money::from_units(1000), None)
            .unwrap();
        service
            .create("Credit", AccountKind::Credit, Money::from_units(-300), None)
            .unwrap();

        let overview = service.overview().unwrap();
        assert_eq!(overview.assets, Money::from_units(1000));
        assert_eq!(overview.debt, Money::from_units(300));
        assert_eq!(overview.net_worth, Money::from_units(700));
        assert_eq!(overview.account_count, 2);
    }
}
