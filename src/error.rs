//! Custom error types for minibank
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Form-style validation failures surface as
//! `Validation` errors and never leave partial state behind.

use thiserror::Error;

use crate::models::Money;

/// The main error type for minibank operations
#[derive(Error, Debug)]
pub enum BankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Not enough money on the funding account
    #[error("Insufficient funds on '{account}': need {needed}, available {available}")]
    InsufficientFunds {
        account: String,
        needed: Money,
        available: Money,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// PIN lock errors
    #[error("Security error: {0}")]
    Security(String),
}

impl BankError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for spending limits
    pub fn limit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Spending limit",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subscriptions
    pub fn subscription_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Subscription",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for auto-payments
    pub fn auto_payment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Auto-payment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payment templates
    pub fn template_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment template",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for deposits
    pub fn deposit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Deposit",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for minibank operations
pub type BankResult<T> = Result<T, BankError>;
