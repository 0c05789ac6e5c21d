//! Ledger service
//!
//! The only place balances and the transaction list change. Every money
//! movement is expressed as a `LedgerAction`; an action is validated in full
//! before anything is written, so a rejected action leaves no trace.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::transaction::{TOP_UP_CATEGORY, TRANSFER_CATEGORY};
use crate::models::{Account, AccountId, Money, Transaction};
use crate::storage::Storage;

/// A single money movement
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    /// Move money between two own accounts
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Money,
        date: NaiveDate,
    },
    /// Pay someone outside the bank
    Payment {
        from: AccountId,
        amount: Money,
        name: String,
        category: String,
        date: NaiveDate,
    },
    /// Money arriving from outside the bank
    TopUp {
        to: AccountId,
        amount: Money,
        source: String,
        date: NaiveDate,
    },
}

impl LedgerAction {
    pub fn amount(&self) -> Money {
        match self {
            Self::Transfer { amount, .. }
            | Self::Payment { amount, .. }
            | Self::TopUp { amount, .. } => *amount,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Payment { .. } => "payment",
            Self::TopUp { .. } => "top-up",
        }
    }
}

/// What an applied action produced
#[derive(Debug, Clone)]
pub struct LedgerOutcome {
    /// New transactions, outgoing leg first for transfers
    pub transactions: Vec<Transaction>,
    /// Accounts after the change
    pub accounts: Vec<Account>,
}

/// Service applying ledger actions
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and apply one action, then persist accounts and transactions
    pub fn apply(&self, action: LedgerAction) -> BankResult<LedgerOutcome> {
        let amount = action.amount();
        if !amount.is_positive() {
            return Err(BankError::Validation(format!(
                "Amount must be positive, got {}",
                amount
            )));
        }

        let (debited, credited, transactions) = match &action {
            LedgerAction::Transfer { from, to, date, .. } => {
                if from == to {
                    return Err(BankError::Validation(
                        "Cannot transfer to the same account".into(),
                    ));
                }
                let source = self.storage.accounts.require(*from)?;
                let target = self.storage.accounts.require(*to)?;

                let mut outgoing = Transaction::outgoing(
                    source.id,
                    format!("Transfer to {}", target.name),
                    TRANSFER_CATEGORY,
                    amount,
                    *date,
                );
                let mut incoming = Transaction::incoming(
                    target.id,
                    format!("Transfer from {}", source.name),
                    TRANSFER_CATEGORY,
                    amount,
                    *date,
                );
                outgoing.linked_transaction_id = Some(incoming.id);
                incoming.linked_transaction_id = Some(outgoing.id);

                (Some(source), Some(target), vec![outgoing, incoming])
            }
            LedgerAction::Payment {
                from,
                name,
                category,
                date,
                ..
            } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(BankError::Validation("Payment name cannot be empty".into()));
                }
                let category = if category.trim().is_empty() {
                    "Payments"
                } else {
                    category.trim()
                };
                let source = self.storage.accounts.require(*from)?;
                let txn = Transaction::outgoing(source.id, name, category, amount, *date);
                (Some(source), None, vec![txn])
            }
            LedgerAction::TopUp { to, source, date, .. } => {
                let target = self.storage.accounts.require(*to)?;
                let name = if source.trim().is_empty() {
                    "Top-up".to_string()
                } else {
                    format!("Top-up from {}", source.trim())
                };
                let txn = Transaction::incoming(target.id, name, TOP_UP_CATEGORY, amount, *date);
                (None, Some(target), vec![txn])
            }
        };

        for txn in &transactions {
            txn.validate()
                .map_err(|e| BankError::Validation(e.to_string()))?;
        }

        if let Some(source) = &debited {
            if !source.can_debit(amount) {
                return Err(BankError::InsufficientFunds {
                    account: source.name.clone(),
                    needed: amount,
                    available: source.available().unwrap_or(source.balance).max(Money::zero()),
                });
            }
        }

        let mut accounts = Vec::new();
        if let Some(mut source) = debited {
            let before = source.clone();
            source
                .adjust_balance(-amount)
                .map_err(|e| BankError::Validation(format!("{}: {}", source.name, e)))?;
            accounts.push((before, source));
        }
        if let Some(mut target) = credited {
            let before = target.clone();
            target
                .adjust_balance(amount)
                .map_err(|e| BankError::Validation(format!("{}: {}", target.name, e)))?;
            accounts.push((before, target));
        }

        // Prepend in reverse so the outgoing leg ends up first
        for txn in transactions.iter().rev() {
            self.storage.transactions.prepend(txn.clone())?;
        }
        for (_, after) in &accounts {
            self.storage.accounts.upsert(after.clone())?;
        }
        self.storage.accounts.save()?;
        self.storage.transactions.save()?;

        for txn in &transactions {
            self.storage.log_create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.name.clone()),
                txn,
            )?;
        }
        for (before, after) in &accounts {
            self.storage.log_update(
                EntityType::Account,
                after.id.to_string(),
                Some(after.name.clone()),
                before,
                after,
            )?;
        }

        info!(kind = action.kind(), amount = %amount, "ledger action applied");
        debug!(?action, "applied");

        Ok(LedgerOutcome {
            transactions,
            accounts: accounts.into_iter().map(|(_, after)| after).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountKind;
    use crate::storage::test_support::create_test_storage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn account(storage: &Storage, name: &str, kind: AccountKind, units: i64) -> Account {
        let account = Account::with_balance(name, kind, Money::from_units(units));
        storage.accounts.upsert(account.clone()).unwrap();
        account
    }

    #[test]
    fn test_transfer_creates_linked_pair() {
        let (_temp_dir, storage) = create_test_storage();
        let card = account(&storage, "Card", AccountKind::Card, 10_000);
        let savings = account(&storage, "Savings", AccountKind::Savings, 0);
        let ledger = LedgerService::new(&storage);

        let outcome = ledger
            .apply(LedgerAction::Transfer {
                from: card.id,
                to: savings.id,
                amount: Money::from_units(2_500),
                date: today(),
            })
            .unwrap();

        let [out, inc] = &outcome.transactions[..] else {
            panic!("expected two legs");
        };
        assert!(!out.is_incoming);
        assert!(inc.is_incoming);
        assert_eq!(out.linked_transaction_id, Some(inc.id));
        assert_eq!(inc.linked_transaction_id, Some(out.id));
        assert_eq!(out.category, TRANSFER_CATEGORY);
        assert!(!out.is_expense());

        let card = storage.accounts.require(card.id).unwrap();
        let savings = storage.accounts.require(savings.id).unwrap();
        assert_eq!(card.balance, Money::from_units(7_500));
        assert_eq!(savings.balance, Money::from_units(2_500));

        let newest = storage.transactions.get_all().unwrap();
        assert_eq!(newest[0].id, out.id);
    }

    #[test]
    fn test_insufficient_funds_leaves_state_untouched() {
        let (_temp_dir, storage) = create_test_storage();
        let card = account(&storage, "Card", AccountKind::Card, 100);
        let ledger = LedgerService::new(&storage);

        let err = ledger
            .apply(LedgerAction::Payment {
                from: card.id,
                amount: Money::from_units(150),
                name: "Shop".into(),
                category: "Shopping".into(),
                date: today(),
            })
            .unwrap_err();

        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(
            storage.accounts.require(card.id).unwrap().balance,
            Money::from_units(100)
        );
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_credit_account_respects_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let mut credit = Account::with_balance("Credit", AccountKind::Credit, Money::from_units(-900));
        credit.credit_limit = Some(Money::from_units(1_000));
        storage.accounts.upsert(credit.clone()).unwrap();
        let ledger = LedgerService::new(&storage);

        let pay = |units| LedgerAction::Payment {
            from: credit.id,
            amount: Money::from_units(units),
            name: "Shop".into(),
            category: "Shopping".into(),
            date: today(),
        };

        assert!(ledger.apply(pay(101)).is_err());
        ledger.apply(pay(100)).unwrap();
        assert_eq!(
            storage.accounts.require(credit.id).unwrap().balance,
            Money::from_units(-1_000)
        );
    }

    #[test]
    fn test_top_up_and_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let card = account(&storage, "Card", AccountKind::Card, 0);
        let ledger = LedgerService::new(&storage);

        let outcome = ledger
            .apply(LedgerAction::TopUp {
                to: card.id,
                amount: Money::from_units(500),
                source: "Other bank".into(),
                date: today(),
            })
            .unwrap();
        assert_eq!(outcome.transactions[0].category, TOP_UP_CATEGORY);
        assert_eq!(outcome.accounts[0].balance, Money::from_units(500));

        assert!(ledger
            .apply(LedgerAction::TopUp {
                to: card.id,
                amount: Money::zero(),
                source: String::new(),
                date: today(),
            })
            .unwrap_err()
            .is_validation());
        assert!(ledger
            .apply(LedgerAction::Transfer {
                from: card.id,
                to: card.id,
                amount: Money::from_units(1),
                date: today(),
            })
            .unwrap_err()
            .is_validation());
        assert!(ledger
            .apply(LedgerAction::Payment {
                from: card.id,
                amount: Money::from_units(1),
                name: "  ".into(),
                category: String::new(),
                date: today(),
            })
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_top_up_beyond_balance_range_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let card = account(&storage, "Card", AccountKind::Card, 124_581);
        let ledger = LedgerService::new(&storage);

        let err = ledger
            .apply(LedgerAction::TopUp {
                to: card.id,
                amount: Money::from_minor(9_223_372_036_854_775_800),
                source: "card".into(),
                date: today(),
            })
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            storage.accounts.require(card.id).unwrap().balance,
            Money::from_units(124_581)
        );
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_account() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);
        let err = ledger
            .apply(LedgerAction::TopUp {
                to: AccountId::new(),
                amount: Money::from_units(1),
                source: String::new(),
                date: today(),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
