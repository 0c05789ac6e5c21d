//! Display formatting for terminal output
//!
//! List views are rendered as tables; detail views are aligned key/value
//! blocks. Money and dates go through the user's settings.

pub mod account;
pub mod budget;
pub mod calc;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_alerts, format_budget_status, format_limit_status};
pub use calc::{format_deposit_list, format_deposit_quote, format_loan};
pub use recurring::{
    format_auto_payment_list, format_run_outcomes, format_subscription_list,
    format_template_list, format_upcoming,
};
pub use report::{format_analytics, format_audit_entries, format_statement};
pub use transaction::{format_transaction_details, format_transaction_list};

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Render rows as a table, right-aligning columns from `numeric_from` on
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, numeric_from: usize) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(numeric_from..), Alignment::right());
    table.to_string()
}

/// Progress bar for a usage percentage, capped at full width
pub(crate) fn usage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage_bar(0.0, 4), "[....]");
        assert_eq!(usage_bar(50.0, 4), "[##..]");
        assert_eq!(usage_bar(250.0, 4), "[####]");
    }
}
