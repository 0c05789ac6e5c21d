//! Budget, spending limit and alert display

use tabled::Tabled;

use crate::calc::AlertLevel;
use crate::config::Settings;
use crate::services::{BudgetStatus, LimitStatus, SpendingAlert};

use super::{render_table, usage_bar};

const BAR_WIDTH: usize = 10;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Usage")]
    bar: String,
    #[tabled(rename = "Budget")]
    amount: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "%")]
    percent: String,
}

#[derive(Tabled)]
struct LimitRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Usage")]
    bar: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "%")]
    percent: String,
}

fn level_marker(level: Option<AlertLevel>) -> &'static str {
    match level {
        Some(AlertLevel::Exceeded) => " !!",
        Some(AlertLevel::Warning) => " !",
        None => "",
    }
}

/// Budgets with this month's spending
pub fn format_budget_status(statuses: &[BudgetStatus], settings: &Settings) -> String {
    if statuses.is_empty() {
        return "No budgets set. Add one with `minibank budget add <category> <amount>`.".to_string();
    }

    let rows: Vec<BudgetRow> = statuses
        .iter()
        .map(|s| BudgetRow {
            category: s.budget.category.clone(),
            bar: usage_bar(s.percent, BAR_WIDTH),
            amount: settings.format_money(s.budget.amount),
            spent: settings.format_money(s.spent),
            remaining: settings.format_money(s.remaining),
            percent: format!("{:.0}%{}", s.percent, level_marker(s.level)),
        })
        .collect();

    render_table(rows, 2)
}

/// Spending limits with this month's usage
pub fn format_limit_status(statuses: &[LimitStatus], settings: &Settings) -> String {
    if statuses.is_empty() {
        return "No spending limits set.".to_string();
    }

    let rows: Vec<LimitRow> = statuses
        .iter()
        .map(|s| LimitRow {
            category: s.limit.category.clone(),
            state: if s.limit.enabled { "on" } else { "off" }.to_string(),
            bar: usage_bar(s.percent, BAR_WIDTH),
            limit: settings.format_money(s.limit.limit),
            spent: settings.format_money(s.spent),
            percent: format!("{:.0}%{}", s.percent, level_marker(s.level)),
        })
        .collect();

    render_table(rows, 3)
}

/// Active alerts, one per line
pub fn format_alerts(alerts: &[SpendingAlert], settings: &Settings) -> String {
    if alerts.is_empty() {
        return "No active spending alerts.".to_string();
    }

    let mut output = String::new();
    for alert in alerts {
        let tag = match alert.level {
            AlertLevel::Exceeded => "[EXCEEDED]",
            AlertLevel::Warning => "[WARNING] ",
        };
        output.push_str(&format!(
            "{} {}\n",
            tag,
            alert.message(&settings.currency_symbol)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Money, SpendingLimit};

    #[test]
    fn test_budget_status_table() {
        let status = BudgetStatus {
            budget: Budget::new("Groceries", Money::from_units(1_000)),
            spent: Money::from_units(900),
            remaining: Money::from_units(100),
            percent: 90.0,
            level: Some(AlertLevel::Warning),
        };
        let output = format_budget_status(&[status], &Settings::default());
        assert!(output.contains("Groceries"));
        assert!(output.contains("[#########.]"));
        assert!(output.contains("90% !"));
        assert!(output.contains("100.00 ₽"));
    }

    #[test]
    fn test_limit_status_shows_state() {
        let mut limit = SpendingLimit::new("Cafe", Money::from_units(100));
        limit.set_enabled(false);
        let status = LimitStatus {
            limit,
            spent: Money::zero(),
            percent: 0.0,
            level: None,
        };
        let output = format_limit_status(&[status], &Settings::default());
        assert!(output.contains("off"));
    }

    #[test]
    fn test_alerts() {
        let alert = SpendingAlert {
            limit: SpendingLimit::new("Cafe", Money::from_units(100)),
            spent: Money::from_units(120),
            percent: 120.0,
            level: AlertLevel::Exceeded,
        };
        let output = format_alerts(&[alert], &Settings::default());
        assert!(output.starts_with("[EXCEEDED] Cafe: monthly limit exceeded"));
        assert_eq!(format_alerts(&[], &Settings::default()), "No active spending alerts.");
    }
}
