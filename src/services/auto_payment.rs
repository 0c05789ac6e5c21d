//! Auto-payment service
//!
//! Recurring bill payments that run as ledger payments once their date
//! comes. A payment that fails stays due and is retried on the next run.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{AccountId, AutoPayment, AutoPaymentId, Money, PaymentFrequency, Transaction};
use crate::storage::Storage;

use super::ledger::{LedgerAction, LedgerService};

/// Optional changes to an auto-payment
#[derive(Debug, Clone, Default)]
pub struct AutoPaymentUpdate {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub account_id: Option<AccountId>,
    pub frequency: Option<PaymentFrequency>,
    pub next_payment_date: Option<NaiveDate>,
}

/// Result of running one due auto-payment
#[derive(Debug)]
pub enum RunOutcome {
    Paid {
        payment: AutoPayment,
        transaction: Transaction,
    },
    Failed {
        payment: AutoPayment,
        error: BankError,
    },
}

impl RunOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid { .. })
    }

    pub fn payment(&self) -> &AutoPayment {
        match self {
            Self::Paid { payment, .. } | Self::Failed { payment, .. } => payment,
        }
    }
}

pub struct AutoPaymentService<'a> {
    storage: &'a Storage,
}

impl<'a> AutoPaymentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        name: &str,
        category: &str,
        amount: Money,
        account_id: AccountId,
        frequency: PaymentFrequency,
        next_payment_date: NaiveDate,
        provider: Option<&str>,
    ) -> BankResult<AutoPayment> {
        self.storage.accounts.require(account_id)?;

        let mut payment = AutoPayment::new(
            name.trim(),
            category.trim(),
            amount,
            account_id,
            frequency,
            next_payment_date,
        );
        payment.provider = provider.unwrap_or_default().trim().to_string();
        payment.validate().map_err(BankError::Validation)?;

        self.storage.auto_payments.upsert(payment.clone())?;
        self.storage.auto_payments.save()?;
        self.storage.log_create(
            EntityType::AutoPayment,
            payment.id.to_string(),
            Some(payment.name.clone()),
            &payment,
        )?;

        info!(name = %payment.name, frequency = %payment.frequency, "auto-payment created");
        Ok(payment)
    }

    /// Find by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> BankResult<Option<AutoPayment>> {
        let wanted = identifier.trim().to_lowercase();
        self.storage
            .auto_payments
            .find(|p| p.name.to_lowercase() == wanted || p.id.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> BankResult<AutoPayment> {
        self.find(identifier)?
            .ok_or_else(|| BankError::auto_payment_not_found(identifier))
    }

    /// All auto-payments ordered by next payment date
    pub fn list(&self) -> BankResult<Vec<AutoPayment>> {
        let mut payments = self.storage.auto_payments.get_all()?;
        payments.sort_by_key(|p| p.next_payment_date);
        Ok(payments)
    }

    pub fn update(&self, id: AutoPaymentId, changes: AutoPaymentUpdate) -> BankResult<AutoPayment> {
        let mut payment = self.storage.auto_payments.require(id)?;
        let before = payment.clone();

        if let Some(name) = changes.name {
            payment.name = name.trim().to_string();
        }
        if let Some(provider) = changes.provider {
            payment.provider = provider.trim().to_string();
        }
        if let Some(category) = changes.category {
            payment.category = category.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            payment.amount = amount;
        }
        if let Some(account_id) = changes.account_id {
            self.storage.accounts.require(account_id)?;
            payment.account_id = account_id;
        }
        if let Some(frequency) = changes.frequency {
            payment.frequency = frequency;
        }
        if let Some(date) = changes.next_payment_date {
            payment.reschedule(date);
        }
        payment.validate().map_err(BankError::Validation)?;
        payment.updated_at = Utc::now();

        self.persist_update(&before, &payment)?;
        Ok(payment)
    }

    pub fn toggle(&self, id: AutoPaymentId) -> BankResult<AutoPayment> {
        let mut payment = self.storage.auto_payments.require(id)?;
        let before = payment.clone();
        payment.enabled = !payment.enabled;
        payment.updated_at = Utc::now();
        self.persist_update(&before, &payment)?;
        Ok(payment)
    }

    pub fn delete(&self, id: AutoPaymentId) -> BankResult<AutoPayment> {
        let payment = self
            .storage
            .auto_payments
            .delete(id)?
            .ok_or_else(|| BankError::auto_payment_not_found(id.to_string()))?;
        self.storage.auto_payments.save()?;
        self.storage.log_delete(
            EntityType::AutoPayment,
            payment.id.to_string(),
            Some(payment.name.clone()),
            &payment,
        )?;
        Ok(payment)
    }

    /// Enabled auto-payments whose date has come
    pub fn due(&self, today: NaiveDate) -> BankResult<Vec<AutoPayment>> {
        let mut due = self.storage.auto_payments.filter(|p| p.is_due(today))?;
        due.sort_by_key(|p| p.next_payment_date);
        Ok(due)
    }

    /// Run every due auto-payment once
    ///
    /// Each run is a single payment dated `today`, even if several periods
    /// were missed; the next date then moves past `today`. The advanced
    /// schedule is saved before the payment is made, so a failed save never
    /// leaves a charge that the next run would repeat.
    pub fn run_due(&self, today: NaiveDate) -> BankResult<Vec<RunOutcome>> {
        let ledger = LedgerService::new(self.storage);
        let mut outcomes = Vec::new();

        for payment in self.due(today)? {
            let mut advanced = payment.clone();
            advanced.mark_paid(today);
            if let Err(error) = self.store(&advanced) {
                self.storage.auto_payments.upsert(payment.clone())?;
                warn!(name = %payment.name, %error, "could not save auto-payment schedule");
                outcomes.push(RunOutcome::Failed { payment, error });
                continue;
            }

            let name = if payment.provider.is_empty() {
                payment.name.clone()
            } else {
                format!("{} ({})", payment.name, payment.provider)
            };
            let action = LedgerAction::Payment {
                from: payment.account_id,
                amount: payment.amount,
                name,
                category: payment.category.clone(),
                date: today,
            };

            match ledger.apply(action) {
                Ok(outcome) => {
                    self.storage.log_update(
                        EntityType::AutoPayment,
                        advanced.id.to_string(),
                        Some(advanced.name.clone()),
                        &payment,
                        &advanced,
                    )?;
                    info!(name = %advanced.name, next = %advanced.next_payment_date, "auto-payment paid");
                    let transaction = outcome
                        .transactions
                        .into_iter()
                        .next()
                        .ok_or_else(|| BankError::Storage("Payment produced no transaction".into()))?;
                    outcomes.push(RunOutcome::Paid {
                        payment: advanced,
                        transaction,
                    });
                }
                Err(error) => {
                    // Nothing was charged, so the old schedule goes back
                    self.store(&payment)?;
                    warn!(name = %payment.name, %error, "auto-payment failed");
                    outcomes.push(RunOutcome::Failed { payment, error });
                }
            }
        }

        Ok(outcomes)
    }

    fn store(&self, payment: &AutoPayment) -> BankResult<()> {
        self.storage.auto_payments.upsert(payment.clone())?;
        self.storage.auto_payments.save()
    }

    fn persist_update(&self, before: &AutoPayment, after: &AutoPayment) -> BankResult<()> {
        self.storage.auto_payments.upsert(after.clone())?;
        self.storage.auto_payments.save()?;
        self.storage.log_update(
            EntityType::AutoPayment,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind};
    use crate::storage::test_support::create_test_storage;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn card(storage: &Storage, units: i64) -> AccountId {
        let account = Account::with_balance("Card", AccountKind::Card, Money::from_units(units));
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        id
    }

    #[test]
    fn test_run_due_pays_and_advances() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = card(&storage, 5_000);
        let service = AutoPaymentService::new(&storage);
        let today = d(2026, 10, 17);

        service
            .create("Internet", "Utilities", Money::from_units(650), account_id, PaymentFrequency::Monthly, d(2026, 10, 15), Some("Rostelecom"))
            .unwrap();
        service
            .create("Rent", "Housing", Money::from_units(30_000), account_id, PaymentFrequency::Monthly, d(2026, 11, 1), None)
            .unwrap();

        let outcomes = service.run_due(today).unwrap();
        assert_eq!(outcomes.len(), 1);
        let RunOutcome::Paid { payment, transaction } = &outcomes[0] else {
            panic!("expected a successful run");
        };
        assert_eq!(payment.next_payment_date, d(2026, 11, 15));
        assert_eq!(payment.last_run, Some(today));
        assert_eq!(transaction.name, "Internet (Rostelecom)");
        assert_eq!(transaction.date, today);

        assert_eq!(
            storage.accounts.require(account_id).unwrap().balance,
            Money::from_units(4_350)
        );
        assert!(service.run_due(today).unwrap().is_empty());
    }

    #[test]
    fn test_failed_run_leaves_payment_due() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = card(&storage, 100);
        let service = AutoPaymentService::new(&storage);
        let today = d(2026, 10, 17);

        let payment = service
            .create("Rent", "Housing", Money::from_units(30_000), account_id, PaymentFrequency::Monthly, d(2026, 10, 1), None)
            .unwrap();

        let outcomes = service.run_due(today).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_paid());

        let stored = storage.auto_payments.require(payment.id).unwrap();
        assert_eq!(stored.next_payment_date, d(2026, 10, 1));
        assert!(stored.last_run.is_none());
        assert_eq!(service.due(today).unwrap().len(), 1);
    }

    #[test]
    fn test_unsaved_schedule_does_not_charge() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = card(&storage, 5_000);
        let service = AutoPaymentService::new(&storage);
        let today = d(2026, 10, 17);

        let payment = service
            .create("Internet", "Utilities", Money::from_units(650), account_id, PaymentFrequency::Monthly, d(2026, 10, 15), None)
            .unwrap();

        // A directory in place of the record file makes every save fail
        let file = storage.paths().record_file("auto_payments");
        std::fs::remove_file(&file).unwrap();
        std::fs::create_dir(&file).unwrap();

        let outcomes = service.run_due(today).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_paid());

        assert_eq!(
            storage.accounts.require(account_id).unwrap().balance,
            Money::from_units(5_000)
        );
        assert_eq!(storage.transactions.count().unwrap(), 0);
        let stored = storage.auto_payments.require(payment.id).unwrap();
        assert_eq!(stored.next_payment_date, d(2026, 10, 15));
    }

    #[test]
    fn test_disabled_payments_do_not_run() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = card(&storage, 1_000);
        let service = AutoPaymentService::new(&storage);
        let payment = service
            .create("Mobile", "Mobile", Money::from_units(500), account_id, PaymentFrequency::Monthly, d(2026, 10, 1), None)
            .unwrap();

        service.toggle(payment.id).unwrap();
        assert!(service.run_due(d(2026, 10, 17)).unwrap().is_empty());
    }

    #[test]
    fn test_create_requires_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AutoPaymentService::new(&storage);
        let err = service
            .create("Mobile", "Mobile", Money::from_units(500), AccountId::new(), PaymentFrequency::Monthly, d(2026, 10, 1), None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_frequency() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = card(&storage, 1_000);
        let service = AutoPaymentService::new(&storage);
        let payment = service
            .create("Insurance", "Insurance", Money::from_units(900), account_id, PaymentFrequency::Monthly, d(2026, 10, 1), None)
            .unwrap();

        let updated = service
            .update(
                payment.id,
                AutoPaymentUpdate {
                    frequency: Some(PaymentFrequency::Quarterly),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.frequency, PaymentFrequency::Quarterly);
        assert_eq!(service.resolve("insurance").unwrap().frequency, PaymentFrequency::Quarterly);
    }
}
