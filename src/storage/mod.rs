//! Storage layer for minibank
//!
//! One persistence boundary for every piece of local state: versioned JSON
//! record files with atomic writes, two single-document state files, and the
//! audit log. Services never touch files directly.

pub mod file_io;
pub mod init;
pub mod migrate;
pub mod records;
pub mod repository;
pub mod state;

pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, seed_demo_data};
pub use migrate::CURRENT_SCHEMA_VERSION;
pub use repository::{Record, Repository};
pub use state::{AlertState, DismissedAlert, DocumentStore, PinState};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BankPaths;
use crate::error::BankResult;
use crate::models::{
    Account, AutoPayment, Budget, Deposit, PaymentTemplate, SpendingLimit, Subscription,
    Transaction,
};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BankPaths,
    audit: AuditLogger,
    pub accounts: Repository<Account>,
    pub transactions: Repository<Transaction>,
    pub budgets: Repository<Budget>,
    pub limits: Repository<SpendingLimit>,
    pub subscriptions: Repository<Subscription>,
    pub auto_payments: Repository<AutoPayment>,
    pub templates: Repository<PaymentTemplate>,
    pub deposits: Repository<Deposit>,
    pub alert_state: DocumentStore<AlertState>,
    pub pin: DocumentStore<PinState>,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: BankPaths) -> BankResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            accounts: repository(&paths),
            transactions: repository(&paths),
            budgets: repository(&paths),
            limits: repository(&paths),
            subscriptions: repository(&paths),
            auto_payments: repository(&paths),
            templates: repository(&paths),
            deposits: repository(&paths),
            alert_state: DocumentStore::new(paths.record_file("alert_state")),
            pin: DocumentStore::new(paths.record_file("pin")),
            paths,
        })
    }

    pub fn paths(&self) -> &BankPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> BankResult<()> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.limits.load()?;
        self.subscriptions.load()?;
        self.auto_payments.load()?;
        self.templates.load()?;
        self.deposits.load()?;
        self.alert_state.load()?;
        self.pin.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> BankResult<()> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        self.limits.save()?;
        self.subscriptions.save()?;
        self.auto_payments.save()?;
        self.templates.save()?;
        self.deposits.save()?;
        self.alert_state.save()?;
        self.pin.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BankResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> BankResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BankResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Whether any accounts have been created yet
    pub fn has_accounts(&self) -> BankResult<bool> {
        Ok(self.accounts.count()? > 0)
    }
}

fn repository<T: Record>(paths: &BankPaths) -> Repository<T> {
    Repository::new(paths.record_file(T::KEY))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Fresh, loaded storage in a temp directory
    pub fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }
}
