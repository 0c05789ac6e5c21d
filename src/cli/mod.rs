//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod autopay;
pub mod budget;
pub mod calc;
pub mod export;
pub mod import;
pub mod limit;
pub mod payment;
pub mod pin;
pub mod report;
pub mod subscription;
pub mod template;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use autopay::{handle_autopay_command, AutoPayCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use calc::{handle_deposit_command, handle_loan_command, DepositCommands, LoanArgs};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportCommands};
pub use limit::{handle_limit_command, LimitCommands};
pub use payment::{handle_payment_command, PaymentCommands};
pub use pin::{handle_pin_command, prompt_pin, PinCommands};
pub use report::{
    handle_analytics_command, handle_audit_command, handle_statement_command, AnalyticsArgs,
    AuditArgs, StatementArgs,
};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use template::{handle_template_command, TemplateCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::error::{BankError, BankResult};
use crate::models::{AccountId, Money, Period};
use crate::storage::Storage;

/// The local calendar day commands run against
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a user-entered amount ("1500", "1 500,50", "99.90")
pub(crate) fn parse_money(input: &str) -> BankResult<Money> {
    Money::parse(input).map_err(|e| {
        BankError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1500' or '1500.50'. Error: {}",
            input, e
        ))
    })
}

/// Parse an ISO date, defaulting to `today` when absent
pub(crate) fn parse_date(input: Option<&str>, today: NaiveDate) -> BankResult<NaiveDate> {
    match input {
        None => Ok(today),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            BankError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", raw))
        }),
    }
}

pub(crate) fn parse_period(input: &str) -> BankResult<Period> {
    Period::parse(input).ok_or_else(|| {
        BankError::Validation(format!(
            "Invalid period: '{}'. Use current, 1, 2, 3 or all",
            input
        ))
    })
}

/// Account names keyed by id, for list views
pub(crate) fn account_names(storage: &Storage) -> BankResult<HashMap<AccountId, String>> {
    Ok(storage
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(parse_date(None, today).unwrap(), today);
        assert_eq!(
            parse_date(Some("2026-01-31"), today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert!(parse_date(Some("31.01.2026"), today).unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_money_and_period() {
        assert_eq!(parse_money("1500").unwrap(), Money::from_units(1_500));
        assert!(parse_money("abc").is_err());
        assert_eq!(parse_period("all").unwrap(), Period::All);
        assert!(parse_period("yesterday").is_err());
    }
}
