//! Storage initialization
//!
//! First-run setup and the demo data set: four accounts and a few months of
//! card history dated relative to the day of initialization.

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::config::paths::BankPaths;
use crate::error::BankResult;
use crate::models::Period;
use crate::models::{Account, AccountKind, Money, Transaction};

use super::Storage;

/// Initialize storage for a fresh installation
pub fn initialize_storage(paths: &BankPaths) -> BankResult<()> {
    paths.ensure_directories()
}

/// Demo accounts: (name, kind, balance in units, card number, rate, credit limit)
const SEED_ACCOUNTS: &[(&str, AccountKind, i64, Option<&str>, Option<f64>, Option<i64>)] = &[
    ("Main card", AccountKind::Card, 124_580, Some("4276 1600 2231 4417"), None, None),
    ("Savings", AccountKind::Savings, 350_000, None, Some(16.0), None),
    ("Broker", AccountKind::Investment, 87_300, None, None, None),
    ("Credit card", AccountKind::Credit, -12_400, Some("5536 9140 7788 0912"), Some(29.9), Some(150_000)),
];

/// Demo card history: (months back, day of month, name, category, units, incoming)
const SEED_TRANSACTIONS: &[(u32, u32, &str, &str, i64, bool)] = &[
    (0, 1, "Salary", "Salary", 95_000, true),
    (0, 2, "Perekrestok", "Groceries", 3_420, false),
    (0, 3, "Yandex Taxi", "Transport", 640, false),
    (0, 5, "Coffee House", "Cafe", 380, false),
    (0, 6, "MTS", "Mobile", 650, false),
    (0, 8, "Pyaterochka", "Groceries", 1_870, false),
    (0, 9, "Cinema", "Entertainment", 900, false),
    (1, 1, "Salary", "Salary", 95_000, true),
    (1, 4, "Perekrestok", "Groceries", 5_210, false),
    (1, 10, "Electricity", "Utilities", 2_150, false),
    (1, 15, "Ozon", "Shopping", 4_990, false),
    (1, 22, "Restaurant", "Cafe", 3_600, false),
    (2, 1, "Salary", "Salary", 95_000, true),
    (2, 12, "Pharmacy", "Health", 1_240, false),
    (2, 18, "Metro", "Transport", 1_500, false),
    (3, 7, "Cashback", "Cashback", 1_120, true),
];

/// Populate an empty store with demo accounts and history
///
/// Does nothing if accounts already exist. Returns the number of accounts created.
pub fn seed_demo_data(storage: &Storage, today: NaiveDate) -> BankResult<usize> {
    if storage.has_accounts()? {
        return Ok(0);
    }

    let mut main_card = None;
    for (index, (name, kind, balance, card, rate, limit)) in SEED_ACCOUNTS.iter().enumerate() {
        let mut account = Account::with_balance(*name, *kind, Money::from_units(*balance));
        account.card_number = card.map(str::to_string);
        account.rate = *rate;
        account.credit_limit = limit.map(Money::from_units);
        account.sort_order = index as i32;
        if main_card.is_none() {
            main_card = Some(account.id);
        }
        storage.accounts.upsert(account)?;
    }

    if let Some(card_id) = main_card {
        for (months_back, day, name, category, units, incoming) in SEED_TRANSACTIONS {
            let date = seed_date(today, *months_back, *day);
            let amount = Money::from_units(*units);
            let txn = if *incoming {
                Transaction::incoming(card_id, *name, *category, amount, date)
            } else {
                Transaction::outgoing(card_id, *name, *category, amount, date)
            };
            storage.transactions.upsert(txn)?;
        }
    }

    storage.accounts.save()?;
    storage.transactions.save()?;

    info!(
        accounts = SEED_ACCOUNTS.len(),
        transactions = SEED_TRANSACTIONS.len(),
        "seeded demo data"
    );
    Ok(SEED_ACCOUNTS.len())
}

/// A date `months_back` months before `today` on `day`, never after `today`
fn seed_date(today: NaiveDate, months_back: u32, day: u32) -> NaiveDate {
    let month_start = Period::LastMonths(months_back)
        .start_date(today)
        .unwrap_or(today);
    let candidate = month_start + Duration::days(day.clamp(1, 28) as i64 - 1);
    candidate.min(today)
}
