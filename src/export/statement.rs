//! Account statement
//!
//! Collects one account's movements over a period with opening and closing
//! balances. Rendering to text lives in the display module.

use chrono::NaiveDate;

use crate::error::BankResult;
use crate::models::{Account, AccountId, Money, Period, Transaction};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct Statement {
    pub account: Account,
    pub period: Period,
    /// First day covered, `None` for all time
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
    pub opening_balance: Money,
    pub closing_balance: Money,
    pub total_in: Money,
    pub total_out: Money,
    /// Oldest first, as statements read
    pub transactions: Vec<Transaction>,
}

/// Build a statement for `account_id` over `period`
///
/// The closing balance is the current balance; the opening balance is
/// derived by reversing the period's movements.
pub fn build_statement(
    storage: &Storage,
    account_id: AccountId,
    period: Period,
    today: NaiveDate,
) -> BankResult<Statement> {
    let account = storage.accounts.require(account_id)?;
    let filter = TransactionFilter::new().account(account_id).period(period);
    let mut transactions = TransactionService::new(storage).list(&filter, today)?;
    transactions.reverse();

    let mut total_in = Money::zero();
    let mut total_out = Money::zero();
    for txn in &transactions {
        if txn.is_incoming {
            total_in += txn.amount;
        } else {
            total_out += txn.amount;
        }
    }

    Ok(Statement {
        opening_balance: account.balance - total_in + total_out,
        closing_balance: account.balance,
        from: period.start_date(today),
        to: today,
        account,
        period,
        total_in,
        total_out,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountKind;
    use crate::storage::test_support::create_test_storage;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_statement_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::with_balance("Card", AccountKind::Card, Money::from_units(1_000));
        let other = Account::new("Other", AccountKind::Card);
        for txn in [
            Transaction::incoming(account.id, "Salary", "Salary", Money::from_units(700), d(2026, 10, 1)),
            Transaction::outgoing(account.id, "Shop", "Groceries", Money::from_units(200), d(2026, 10, 5)),
            Transaction::outgoing(account.id, "Old", "Cafe", Money::from_units(50), d(2026, 9, 5)),
            Transaction::outgoing(other.id, "Elsewhere", "Cafe", Money::from_units(9), d(2026, 10, 5)),
        ] {
            storage.transactions.upsert(txn).unwrap();
        }
        storage.accounts.upsert(account.clone()).unwrap();

        let statement = build_statement(&storage, account.id, Period::CurrentMonth, d(2026, 10, 17)).unwrap();
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.transactions[0].name, "Salary");
        assert_eq!(statement.total_in, Money::from_units(700));
        assert_eq!(statement.total_out, Money::from_units(200));
        assert_eq!(statement.opening_balance, Money::from_units(500));
        assert_eq!(statement.closing_balance, Money::from_units(1_000));
        assert_eq!(statement.from, Some(d(2026, 10, 1)));
    }

    #[test]
    fn test_unknown_account() {
        let (_temp_dir, storage) = create_test_storage();
        let err = build_statement(&storage, AccountId::new(), Period::All, d(2026, 1, 1)).unwrap_err();
        assert!(err.is_not_found());
    }
}
