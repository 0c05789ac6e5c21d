//! Transaction service
//!
//! History queries over the transaction list. Transactions are only created
//! by ledger actions; this service reads them and can look up transfer legs.

use chrono::NaiveDate;

use crate::error::{BankError, BankResult};
use crate::models::{AccountId, Direction, Period, Transaction, TransactionId};
use crate::storage::Storage;

/// Filter options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by account
    pub account_id: Option<AccountId>,
    /// Case-insensitive category match (equality or substring)
    pub category: Option<String>,
    /// Filter by direction
    pub direction: Option<Direction>,
    /// Calendar-month period relative to today
    pub period: Option<Period>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every set criterion
    pub fn matches(&self, txn: &Transaction, today: NaiveDate) -> bool {
        if self.account_id.is_some_and(|id| txn.account_id != id) {
            return false;
        }
        if let Some(category) = &self.category {
            if !txn.category_matches(category) {
                return false;
            }
        }
        if self.direction.is_some_and(|d| txn.direction() != d) {
            return false;
        }
        if let Some(period) = &self.period {
            if !period.contains(txn.date, today) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !txn.name.to_lowercase().contains(&search.trim().to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Service for reading transaction history
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self, id: TransactionId) -> BankResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by its short or full id
    pub fn find(&self, identifier: &str) -> BankResult<Transaction> {
        self.storage
            .transactions
            .find(|t| t.id.matches(identifier))?
            .ok_or_else(|| BankError::transaction_not_found(identifier))
    }

    /// Transactions matching `filter`, newest first
    pub fn list(&self, filter: &TransactionFilter, today: NaiveDate) -> BankResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.get_newest_first()?;
        transactions.retain(|t| filter.matches(t, today));
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// The other leg of a transfer
    pub fn linked(&self, txn: &Transaction) -> BankResult<Option<Transaction>> {
        match txn.linked_transaction_id {
            Some(id) => self.storage.transactions.get(id),
            None => Ok(None),
        }
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> BankResult<Vec<String>> {
        let mut seen: Vec<String> = Vec::new();
        for txn in self.storage.transactions.get_all()? {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&txn.category)) {
                seen.push(txn.category);
            }
        }
        Ok(seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind, Money};
    use crate::storage::test_support::create_test_storage;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn populate(storage: &Storage) -> (AccountId, AccountId) {
        let card = Account::new("Card", AccountKind::Card);
        let credit = Account::new("Credit", AccountKind::Credit);
        let (card_id, credit_id) = (card.id, credit.id);
        storage.accounts.upsert(card).unwrap();
        storage.accounts.upsert(credit).unwrap();

        let txns = [
            Transaction::outgoing(card_id, "Pyaterochka", "Groceries", Money::from_units(500), d(2026, 10, 3)),
            Transaction::outgoing(card_id, "Coffee", "Cafe", Money::from_units(200), d(2026, 9, 28)),
            Transaction::incoming(card_id, "Salary", "Salary", Money::from_units(90_000), d(2026, 8, 1)),
            Transaction::outgoing(credit_id, "Perekrestok", "Groceries", Money::from_units(700), d(2026, 7, 15)),
        ];
        for txn in txns {
            storage.transactions.upsert(txn).unwrap();
        }
        (card_id, credit_id)
    }

    #[test]
    fn test_period_filter() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let service = TransactionService::new(&storage);
        let today = d(2026, 10, 17);

        let count = |period| {
            service
                .list(&TransactionFilter::new().period(period), today)
                .unwrap()
                .len()
        };
        assert_eq!(count(Period::CurrentMonth), 1);
        assert_eq!(count(Period::LastMonths(1)), 2);
        assert_eq!(count(Period::LastMonths(2)), 3);
        assert_eq!(count(Period::LastMonths(3)), 4);
        assert_eq!(count(Period::All), 4);
    }

    #[test]
    fn test_combined_filters_newest_first() {
        let (_temp_dir, storage) = create_test_storage();
        let (card_id, _) = populate(&storage);
        let service = TransactionService::new(&storage);
        let today = d(2026, 10, 17);

        let groceries = service
            .list(&TransactionFilter::new().category("grocer"), today)
            .unwrap();
        assert_eq!(groceries.len(), 2);
        assert!(groceries[0].date > groceries[1].date);

        let card_out = service
            .list(
                &TransactionFilter::new()
                    .account(card_id)
                    .direction(Direction::Outgoing),
                today,
            )
            .unwrap();
        assert_eq!(card_out.len(), 2);

        let found = service
            .list(&TransactionFilter::new().search("salary").limit(5), today)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_incoming);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let service = TransactionService::new(&storage);
        let first = storage.transactions.get_all().unwrap()[0].clone();

        assert_eq!(service.find(&first.id.short()).unwrap().id, first.id);
        assert!(service.find("txn-00000000").unwrap_err().is_not_found());
        assert_eq!(service.categories().unwrap().len(), 3);
    }
}
