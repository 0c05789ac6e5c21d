//! Analytics, statement and audit log output

use tabled::Tabled;

use crate::audit::AuditEntry;
use crate::config::Settings;
use crate::export::Statement;
use crate::services::AnalyticsReport;

use super::{render_table, usage_bar};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Share")]
    bar: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "%")]
    percent: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct StatementRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "In")]
    incoming: String,
    #[tabled(rename = "Out")]
    outgoing: String,
}

/// Income and spending breakdown for a period
pub fn format_analytics(report: &AnalyticsReport, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Analytics: {}\n", report.period));
    output.push_str(&format!("  Income:    {}\n", settings.format_money(report.income)));
    output.push_str(&format!("  Expenses:  {}\n", settings.format_money(report.expenses)));
    output.push_str(&format!("  Net:       {}\n", settings.format_money(report.net)));
    output.push_str(&format!("  Transactions: {}\n", report.transaction_count));

    if report.by_category.is_empty() {
        output.push_str("\nNo spending in this period.\n");
    } else {
        let rows: Vec<CategoryRow> = report
            .by_category
            .iter()
            .map(|c| CategoryRow {
                category: c.category.clone(),
                bar: usage_bar(c.percent, 20),
                count: c.count,
                amount: settings.format_money(c.amount),
                percent: format!("{:.1}%", c.percent),
            })
            .collect();
        output.push_str("\nSpending by category\n");
        output.push_str(&render_table(rows, 2));
        output.push('\n');
    }

    if report.by_month.len() > 1 {
        let rows: Vec<MonthRow> = report
            .by_month
            .iter()
            .map(|m| MonthRow {
                month: m.month.format("%m.%Y").to_string(),
                income: settings.format_money(m.income),
                expenses: settings.format_money(m.expenses),
                net: settings.format_money(m.net()),
            })
            .collect();
        output.push_str("\nBy month\n");
        output.push_str(&render_table(rows, 1));
        output.push('\n');
    }

    output
}

/// Plain-text account statement
pub fn format_statement(statement: &Statement, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Statement: {}\n", statement.account.name));
    output.push_str(&format!("  Account type:     {}\n", statement.account.kind));
    if let Some(card) = statement.account.masked_card_number() {
        output.push_str(&format!("  Card:             {}\n", card));
    }
    let from = statement
        .from
        .map(|d| settings.format_date(d))
        .unwrap_or_else(|| "account opening".to_string());
    output.push_str(&format!(
        "  Period:           {} to {}\n",
        from,
        settings.format_date(statement.to)
    ));
    output.push_str(&format!(
        "  Opening balance:  {}\n",
        settings.format_money(statement.opening_balance)
    ));
    output.push_str(&format!(
        "  Money in:         {}\n",
        settings.format_money(statement.total_in)
    ));
    output.push_str(&format!(
        "  Money out:        {}\n",
        settings.format_money(statement.total_out)
    ));
    output.push_str(&format!(
        "  Closing balance:  {}\n",
        settings.format_money(statement.closing_balance)
    ));
    output.push('\n');

    if statement.transactions.is_empty() {
        output.push_str("No transactions in this period.\n");
        return output;
    }

    let rows: Vec<StatementRow> = statement
        .transactions
        .iter()
        .map(|t| {
            let amount = settings.format_money(t.amount);
            let (incoming, outgoing) = if t.is_incoming {
                (amount, String::new())
            } else {
                (String::new(), amount)
            };
            StatementRow {
                date: settings.format_date(t.date),
                name: t.name.clone(),
                category: t.category.clone(),
                incoming,
                outgoing,
            }
        })
        .collect();
    output.push_str(&render_table(rows, 3));
    output.push('\n');
    output
}

/// Audit log entries, oldest first
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
