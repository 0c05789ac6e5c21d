//! Transaction model
//!
//! A transaction records one money movement on one account. The amount is
//! always positive; direction is carried by `is_incoming`. Dates are canonical
//! calendar dates, never display labels.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Category assigned to both legs of an own-account transfer
pub const TRANSFER_CATEGORY: &str = "Transfers";

/// Category assigned to top-ups
pub const TOP_UP_CATEGORY: &str = "Top-up";

/// Money direction relative to the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "in"),
            Self::Outgoing => write!(f, "out"),
        }
    }
}

/// A recorded money movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// Merchant, payee or description
    pub name: String,

    /// Free-form category ("Groceries", "Transport", ...)
    pub category: String,

    /// Always positive
    pub amount: Money,

    /// Whether money came into the account
    pub is_incoming: bool,

    /// Transaction date
    pub date: NaiveDate,

    /// Icon key for front ends
    #[serde(default)]
    pub icon: String,

    /// For transfers, the other leg of the pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_transaction_id: Option<TransactionId>,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create an outgoing transaction
    pub fn outgoing(
        account_id: AccountId,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::build(account_id, name.into(), category.into(), amount, false, date)
    }

    /// Create an incoming transaction
    pub fn incoming(
        account_id: AccountId,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::build(account_id, name.into(), category.into(), amount, true, date)
    }

    fn build(
        account_id: AccountId,
        name: String,
        category: String,
        amount: Money,
        is_incoming: bool,
        date: NaiveDate,
    ) -> Self {
        let icon = icon_for_category(&category).to_string();
        Self {
            id: TransactionId::new(),
            account_id,
            name,
            category,
            amount,
            is_incoming,
            date,
            icon,
            linked_transaction_id: None,
            created_at: Utc::now(),
        }
    }

    /// Direction of the movement
    pub fn direction(&self) -> Direction {
        if self.is_incoming {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    /// Amount with the sign applied (negative for outgoing)
    pub fn signed_amount(&self) -> Money {
        if self.is_incoming {
            self.amount
        } else {
            -self.amount
        }
    }

    /// Whether this is one leg of an own-account transfer
    pub fn is_transfer(&self) -> bool {
        self.linked_transaction_id.is_some()
    }

    /// Outgoing money that counts as spending (transfers excluded)
    pub fn is_expense(&self) -> bool {
        !self.is_incoming && !self.is_transfer()
    }

    /// Case-insensitive category match by equality or substring
    pub fn category_matches(&self, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        let own = self.category.to_lowercase();
        own == wanted || own.contains(&wanted)
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.name.trim().is_empty() {
            return Err(TransactionValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.name, self.signed_amount())
    }
}

/// Pick an icon key for a category
pub fn icon_for_category(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("transfer") {
        "arrows"
    } else if category.contains("top-up") || category.contains("salary") {
        "wallet"
    } else if category.contains("grocer") || category.contains("food") {
        "cart"
    } else if category.contains("cafe") || category.contains("restaurant") {
        "coffee"
    } else if category.contains("transport") || category.contains("taxi") {
        "car"
    } else if category.contains("util") || category.contains("internet") || category.contains("mobile") {
        "bolt"
    } else if category.contains("subscription") || category.contains("entertainment") {
        "play"
    } else {
        "receipt"
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyName,
    NonPositiveAmount(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Transaction name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
