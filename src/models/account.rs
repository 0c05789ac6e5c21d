//! Account model
//!
//! Represents balance-holding accounts: payment cards, savings, investment
//! and credit accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Debit payment card
    #[default]
    Card,
    /// Savings account
    Savings,
    /// Brokerage / investment account
    Investment,
    /// Credit card or credit line
    Credit,
}

impl AccountKind {
    /// Credit accounts carry debt as a negative balance
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Credit)
    }

    /// Parse account kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "card" | "debit" => Some(Self::Card),
            "savings" | "saving" => Some(Self::Savings),
            "investment" | "invest" => Some(Self::Investment),
            "credit" | "credit_card" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "Card"),
            Self::Savings => write!(f, "Savings"),
            Self::Investment => write!(f, "Investment"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// A balance-holding account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name (e.g., "Main card")
    pub name: String,

    /// Kind of account
    #[serde(rename = "type")]
    pub kind: AccountKind,

    /// Current balance; negative on credit accounts means debt
    pub balance: Money,

    /// Card number, stored as entered and masked on display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,

    /// Annual rate in percent (savings yield or credit interest)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,

    /// How far below zero a credit account may go
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,

    /// Sort order for display
    #[serde(default)]
    pub sort_order: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            kind,
            balance: Money::zero(),
            card_number: None,
            rate: None,
            credit_limit: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an opening balance
    pub fn with_balance(name: impl Into<String>, kind: AccountKind, balance: Money) -> Self {
        let mut account = Self::new(name, kind);
        account.balance = balance;
        account
    }

    /// The most that can be debited from this account right now
    ///
    /// `None` means unbounded (a credit account without a configured limit).
    pub fn available(&self) -> Option<Money> {
        match (self.kind, self.credit_limit) {
            (AccountKind::Credit, Some(limit)) => Some(self.balance + limit),
            (AccountKind::Credit, None) => None,
            _ => Some(self.balance),
        }
    }

    /// Whether a debit of `amount` is allowed
    pub fn can_debit(&self, amount: Money) -> bool {
        self.available().map_or(true, |available| available >= amount)
    }

    /// Apply a signed change to the balance
    ///
    /// Leaves the account untouched when the new balance would not fit.
    pub fn adjust_balance(&mut self, delta: Money) -> Result<(), AccountValidationError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(AccountValidationError::BalanceOutOfRange)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Card number masked to its last four digits ("•• 4417")
    pub fn masked_card_number(&self) -> Option<String> {
        self.card_number.as_ref().map(|number| {
            let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
            let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
            format!("•• {}", tail)
        })
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if let Some(rate) = self.rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(AccountValidationError::InvalidRate(rate));
            }
        }

        if self.credit_limit.is_some() && !self.kind.is_credit() {
            return Err(AccountValidationError::CreditLimitOnNonCredit);
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidRate(f64),
    CreditLimitOnNonCredit,
    BalanceOutOfRange,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::InvalidRate(rate) => write!(f, "Rate must be between 0 and 100, got {}", rate),
            Self::CreditLimitOnNonCredit => {
                write!(f, "Only credit accounts can have a credit limit")
            }
            Self::BalanceOutOfRange => write!(f, "Resulting balance is out of range"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Main card", AccountKind::Card);
        assert_eq!(account.name, "Main card");
        assert_eq!(account.kind, AccountKind::Card);
        assert_eq!(account.balance, Money::zero());
    }

    #[test]
    fn test_adjust_balance_rejects_overflow() {
        let mut card = Account::with_balance("Card", AccountKind::Card, Money::from_units(100));
        card.adjust_balance(Money::from_units(-40)).unwrap();
        assert_eq!(card.balance, Money::from_units(60));

        let result = card.adjust_balance(Money::from_minor(i64::MAX));
        assert_eq!(result, Err(AccountValidationError::BalanceOutOfRange));
        assert_eq!(card.balance, Money::from_units(60));
    }

    #[test]
    fn test_available_and_can_debit() {
        let card = Account::with_balance("Card", AccountKind::Card, Money::from_units(100));
        assert!(card.can_debit(Money::from_units(100)));
        assert!(!card.can_debit(Money::from_units(101)));

        let mut credit = Account::with_balance("Credit", AccountKind::Credit, Money::from_units(-50));
        assert!(credit.can_debit(Money::from_units(1_000_000)));

        credit.credit_limit = Some(Money::from_units(100));
        assert_eq!(credit.available(), Some(Money::from_units(50)));
        assert!(!credit.can_debit(Money::from_units(51)));
    }

    #[test]
    fn test_masked_card_number() {
        let mut account = Account::new("Card", AccountKind::Card);
        assert_eq!(account.masked_card_number(), None);
        account.card_number = Some("4276 1600 1234 4417".into());
        assert_eq!(account.masked_card_number().as_deref(), Some("•• 4417"));
    }

    #[test]
    fn test_validation() {
        let mut account = Account::new("Valid", AccountKind::Savings);
        assert!(account.validate().is_ok());

        account.rate = Some(150.0);
        assert_eq!(account.validate(), Err(AccountValidationError::InvalidRate(150.0)));

        account.rate = None;
        account.credit_limit = Some(Money::from_units(10));
        assert_eq!(
            account.validate(),
            Err(AccountValidationError::CreditLimitOnNonCredit)
        );

        account.credit_limit = None;
        account.name = "  ".into();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AccountKind::parse("CARD"), Some(AccountKind::Card));
        assert_eq!(AccountKind::parse("credit_card"), Some(AccountKind::Credit));
        assert_eq!(AccountKind::parse("checking"), None);
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let account = Account::new("Broker", AccountKind::Investment);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "investment");
    }
}
