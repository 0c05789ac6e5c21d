//! JSON Export functionality
//!
//! Exports every record collection to one JSON document with schema
//! versioning. The PIN hash and alert state are not part of an export.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BankError, BankResult};
use crate::models::{
    Account, AutoPayment, Budget, Deposit, PaymentTemplate, SpendingLimit, Subscription,
    Transaction,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub spending_limits: Vec<SpendingLimit>,
    pub subscriptions: Vec<Subscription>,
    pub auto_payments: Vec<AutoPayment>,
    pub payment_templates: Vec<PaymentTemplate>,
    pub deposits: Vec<Deposit>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub account_count: usize,
    pub transaction_count: usize,
    /// Earliest transaction date, ISO-8601
    pub earliest_transaction: Option<String>,
    /// Latest transaction date, ISO-8601
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> BankResult<Self> {
        let accounts = storage.accounts.get_sorted()?;
        let transactions = storage.transactions.get_newest_first()?;

        let metadata = ExportMetadata {
            account_count: accounts.len(),
            transaction_count: transactions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            accounts,
            transactions,
            budgets: storage.budgets.get_all()?,
            spending_limits: storage.limits.get_all()?,
            subscriptions: storage.subscriptions.get_all()?,
            auto_payments: storage.auto_payments.get_all()?,
            payment_templates: storage.templates.get_all()?,
            deposits: storage.deposits.get_all()?,
            metadata,
        })
    }

    /// Check the schema version and account references
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();

        for txn in &self.transactions {
            if !account_ids.contains(&txn.account_id) {
                return Err(format!(
                    "Transaction {} references unknown account {}",
                    txn.id, txn.account_id
                ));
            }
        }
        for payment in &self.auto_payments {
            if !account_ids.contains(&payment.account_id) {
                return Err(format!(
                    "Auto-payment {} references unknown account {}",
                    payment.id, payment.account_id
                ));
            }
        }
        for deposit in &self.deposits {
            if !account_ids.contains(&deposit.funding_account_id) {
                return Err(format!(
                    "Deposit {} references unknown account {}",
                    deposit.id, deposit.funding_account_id
                ));
            }
        }

        Ok(())
    }

    /// Replace every collection in `storage` with this export's records
    ///
    /// PIN and dismissed alerts are left alone. Returns the number of records written.
    pub fn restore_into(self, storage: &Storage) -> BankResult<usize> {
        let count = self.accounts.len()
            + self.transactions.len()
            + self.budgets.len()
            + self.spending_limits.len()
            + self.subscriptions.len()
            + self.auto_payments.len()
            + self.payment_templates.len()
            + self.deposits.len();

        storage.accounts.replace_all(self.accounts)?;
        storage.transactions.replace_all(self.transactions)?;
        storage.budgets.replace_all(self.budgets)?;
        storage.limits.replace_all(self.spending_limits)?;
        storage.subscriptions.replace_all(self.subscriptions)?;
        storage.auto_payments.replace_all(self.auto_payments)?;
        storage.templates.replace_all(self.payment_templates)?;
        storage.deposits.replace_all(self.deposits)?;
        storage.save_all()?;

        info!(records = count, exported_at = %self.exported_at, "export restored");
        Ok(count)
    }
}

/// Export everything to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> BankResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BankError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> BankResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| BankError::Import(e.to_string()))?;
    export.validate().map_err(BankError::Import)?;
    Ok(export)
}
