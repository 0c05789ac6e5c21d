//! Record bindings for every persisted model
//!
//! Maps each model to its storage key and adds the type-specific queries
//! services need.

use serde_json::Value;

use crate::error::BankResult;
use crate::models::{
    Account, AccountId, AutoPayment, AutoPaymentId, Budget, BudgetId, Deposit, DepositId,
    PaymentTemplate, SpendingLimit, SpendingLimitId, Subscription, SubscriptionId, TemplateId,
    Transaction, TransactionId,
};

use super::repository::{Record, Repository};

impl Record for Account {
    type Id = AccountId;
    const KEY: &'static str = "accounts";
    const ENTITY: &'static str = "Account";

    fn id(&self) -> AccountId {
        self.id
    }
}

impl Record for Transaction {
    type Id = TransactionId;
    const KEY: &'static str = "transactions";
    const ENTITY: &'static str = "Transaction";

    fn id(&self) -> TransactionId {
        self.id
    }

    /// Version 0 dumps carry a signed amount and no direction flag
    fn migrate(from: u32, mut record: Value) -> BankResult<Value> {
        if from == 0 && record.get("is_incoming").is_none() {
            let amount = record.get("amount").and_then(Value::as_i64).unwrap_or(0);
            record["is_incoming"] = Value::Bool(amount > 0);
            record["amount"] = Value::from(amount.abs());
        }
        Ok(record)
    }
}

impl Record for Budget {
    type Id = BudgetId;
    const KEY: &'static str = "budgets";
    const ENTITY: &'static str = "Budget";

    fn id(&self) -> BudgetId {
        self.id
    }
}

impl Record for SpendingLimit {
    type Id = SpendingLimitId;
    const KEY: &'static str = "spending_limits";
    const ENTITY: &'static str = "Spending limit";

    fn id(&self) -> SpendingLimitId {
        self.id
    }
}

impl Record for Subscription {
    type Id = SubscriptionId;
    const KEY: &'static str = "subscriptions";
    const ENTITY: &'static str = "Subscription";

    fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Record for AutoPayment {
    type Id = AutoPaymentId;
    const KEY: &'static str = "auto_payments";
    const ENTITY: &'static str = "Auto-payment";

    fn id(&self) -> AutoPaymentId {
        self.id
    }
}

impl Record for PaymentTemplate {
    type Id = TemplateId;
    const KEY: &'static str = "payment_templates";
    const ENTITY: &'static str = "Payment template";

    fn id(&self) -> TemplateId {
        self.id
    }
}

impl Record for Deposit {
    type Id = DepositId;
    const KEY: &'static str = "deposits";
    const ENTITY: &'static str = "Deposit";

    fn id(&self) -> DepositId {
        self.id
    }
}

impl Repository<Account> {
    /// All accounts in display order
    pub fn get_sorted(&self) -> BankResult<Vec<Account>> {
        let mut accounts = self.get_all()?;
        accounts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(accounts)
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BankResult<Option<Account>> {
        let name_lower = name.trim().to_lowercase();
        self.find(|a| a.name.to_lowercase() == name_lower)
    }

    /// Check if an account name is already taken
    pub fn name_exists(&self, name: &str, exclude_id: Option<AccountId>) -> BankResult<bool> {
        let name_lower = name.trim().to_lowercase();
        Ok(self
            .find(|a| a.name.to_lowercase() == name_lower && Some(a.id) != exclude_id)?
            .is_some())
    }
}

impl Repository<Transaction> {
    /// All transactions, newest first
    pub fn get_newest_first(&self) -> BankResult<Vec<Transaction>> {
        let mut transactions = self.get_all()?;
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions for one account, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> BankResult<Vec<Transaction>> {
        let mut transactions = self.filter(|t| t.account_id == account_id)?;
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }
}

/// Newest date first; same-day entries keep most recently created first
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountKind, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_account_name_queries() {
        let temp_dir = TempDir::new().unwrap();
        let repo: Repository<Account> = Repository::new(temp_dir.path().join("accounts.json"));
        let account = Account::new("Main Card", AccountKind::Card);
        let id = account.id;
        repo.upsert(account).unwrap();

        assert!(repo.get_by_name("main card").unwrap().is_some());
        assert!(repo.name_exists("MAIN CARD", None).unwrap());
        assert!(!repo.name_exists("main card", Some(id)).unwrap());
    }

    #[test]
    fn test_transactions_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo: Repository<Transaction> =
            Repository::new(temp_dir.path().join("transactions.json"));
        let account = AccountId::new();
        let other = AccountId::new();
        let old = Transaction::outgoing(
            account,
            "Old",
            "Misc",
            Money::from_units(1),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        );
        let new = Transaction::outgoing(
            account,
            "New",
            "Misc",
            Money::from_units(1),
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        );
        let foreign = Transaction::outgoing(
            other,
            "Other",
            "Misc",
            Money::from_units(1),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        repo.upsert(old).unwrap();
        repo.upsert(foreign).unwrap();
        repo.upsert(new).unwrap();

        let all = repo.get_newest_first().unwrap();
        assert_eq!(all[0].name, "New");
        assert_eq!(all[1].name, "Other");

        let mine = repo.get_by_account(account).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[1].name, "Old");
    }
}
