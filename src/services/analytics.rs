//! Analytics service
//!
//! Income, spending and category breakdowns over a calendar-month period.
//! Transfers between own accounts are neither income nor spending.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::BankResult;
use crate::models::{months_ago, AccountId, Money, Period, Transaction};
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Money,
    /// Share of total spending in percent
    pub percent: f64,
    pub count: usize,
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotals {
    /// 0 for the current month, 1 for the previous one
    pub offset: u32,
    pub month: NaiveDate,
    pub income: Money,
    pub expenses: Money,
}

impl MonthTotals {
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub period: Period,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
    /// Largest category first
    pub by_category: Vec<CategoryShare>,
    /// Current month first
    pub by_month: Vec<MonthTotals>,
    pub transaction_count: usize,
}

pub struct AnalyticsService<'a> {
    storage: &'a Storage,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn report(
        &self,
        period: Period,
        account_id: Option<AccountId>,
        today: NaiveDate,
    ) -> BankResult<AnalyticsReport> {
        let transactions = self.storage.transactions.filter(|t| {
            !t.is_transfer()
                && period.contains(t.date, today)
                && account_id.map_or(true, |id| t.account_id == id)
        })?;
        Ok(build_report(period, &transactions, today))
    }
}

/// Aggregate already filtered transactions
pub fn build_report(period: Period, transactions: &[Transaction], today: NaiveDate) -> AnalyticsReport {
    let mut income = Money::zero();
    let mut expenses = Money::zero();
    // keyed by lowercase category; keeps the first spelling seen
    let mut categories: BTreeMap<String, (String, Money, usize)> = BTreeMap::new();
    let mut months: BTreeMap<u32, (Money, Money)> = BTreeMap::new();

    for txn in transactions.iter().filter(|t| !t.is_transfer()) {
        let offset = months_ago(txn.date, today);
        let month = months.entry(offset).or_default();
        if txn.is_incoming {
            income += txn.amount;
            month.0 += txn.amount;
        } else {
            expenses += txn.amount;
            month.1 += txn.amount;
            let entry = categories
                .entry(txn.category.to_lowercase())
                .or_insert_with(|| (txn.category.clone(), Money::zero(), 0));
            entry.1 += txn.amount;
            entry.2 += 1;
        }
    }

    let mut by_category: Vec<CategoryShare> = categories
        .into_values()
        .map(|(category, amount, count)| CategoryShare {
            percent: if expenses.is_positive() {
                amount.minor() as f64 / expenses.minor() as f64 * 100.0
            } else {
                0.0
            },
            category,
            amount,
            count,
        })
        .collect();
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

    let by_month = months
        .into_iter()
        .map(|(offset, (income, expenses))| MonthTotals {
            offset,
            month: Period::LastMonths(offset).start_date(today).unwrap_or(today),
            income,
            expenses,
        })
        .collect();

    AnalyticsReport {
        period,
        income,
        expenses,
        net: income - expenses,
        by_category,
        by_month,
        transaction_count: transactions.len(),
    }
}
