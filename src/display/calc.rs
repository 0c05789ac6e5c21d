//! Calculator and deposit display

use tabled::Tabled;

use crate::calc::LoanTerms;
use crate::config::Settings;
use crate::models::Money;
use crate::services::{DepositQuote, DepositSummary};

use super::render_table;

#[derive(Tabled)]
struct ScheduleLine {
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

#[derive(Tabled)]
struct DepositRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Opened")]
    opened: String,
    #[tabled(rename = "Matures")]
    matures: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Accrued")]
    accrued: String,
    #[tabled(rename = "At maturity")]
    expected: String,
}

fn units(settings: &Settings, value: f64) -> String {
    settings.format_money(Money::from_units_f64(value))
}

/// Loan summary, optionally followed by the amortization schedule
pub fn format_loan(terms: &LoanTerms, show_schedule: bool, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str("Loan calculation\n");
    output.push_str(&format!("  Amount:           {}\n", units(settings, terms.principal)));
    output.push_str(&format!("  Rate:             {:.2}% per year\n", terms.annual_rate));
    output.push_str(&format!("  Term:             {} months\n", terms.months));
    output.push('\n');
    output.push_str(&format!(
        "  Monthly payment:  {}\n",
        units(settings, terms.monthly_payment())
    ));
    output.push_str(&format!("  Total paid:       {}\n", units(settings, terms.total_paid())));
    output.push_str(&format!("  Overpayment:      {}\n", units(settings, terms.overpayment())));

    if show_schedule {
        let rows: Vec<ScheduleLine> = terms
            .schedule()
            .into_iter()
            .map(|row| ScheduleLine {
                month: row.month,
                payment: units(settings, row.payment),
                interest: units(settings, row.interest),
                principal: units(settings, row.principal),
                remaining: units(settings, row.remaining),
            })
            .collect();
        output.push('\n');
        output.push_str(&render_table(rows, 0));
        output.push('\n');
    }

    output
}

/// Expected deposit income
pub fn format_deposit_quote(
    quote: &DepositQuote,
    rate: f64,
    months: u32,
    settings: &Settings,
) -> String {
    let mut output = String::new();
    output.push_str("Deposit calculation\n");
    output.push_str(&format!("  Amount:       {}\n", settings.format_money(quote.amount)));
    output.push_str(&format!("  Rate:         {:.2}% per year\n", rate));
    output.push_str(&format!("  Term:         {} months\n", months));
    output.push_str(&format!("  Interest:     {}\n", settings.format_money(quote.interest)));
    output.push_str(&format!("  At maturity:  {}\n", settings.format_money(quote.total)));
    output
}

/// Opened deposits with accrued interest
pub fn format_deposit_list(summaries: &[DepositSummary], settings: &Settings) -> String {
    if summaries.is_empty() {
        return "No deposits opened.".to_string();
    }

    let rows: Vec<DepositRow> = summaries
        .iter()
        .map(|s| DepositRow {
            name: if s.matured {
                format!("{} (matured)", s.deposit.name)
            } else {
                s.deposit.name.clone()
            },
            opened: settings.format_date(s.deposit.opened_on),
            matures: settings.format_date(s.maturity_date),
            rate: format!("{:.2}%", s.deposit.rate),
            principal: settings.format_money(s.deposit.principal),
            accrued: settings.format_money(s.accrued),
            expected: settings.format_money(s.deposit.principal + s.expected_interest),
        })
        .collect();

    render_table(rows, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Deposit};
    use crate::services::DepositService;
    use chrono::NaiveDate;

    #[test]
    fn test_interest_free_loan() {
        let terms = LoanTerms::new(100_000.0, 0.0, 10).unwrap();
        let output = format_loan(&terms, false, &Settings::default());
        assert!(output.contains("Monthly payment:  10000.00 ₽"));
        assert!(output.contains("Overpayment:      0.00 ₽"));
        assert!(!output.contains("Remaining"));
    }

    #[test]
    fn test_loan_schedule_rows() {
        let terms = LoanTerms::new(1_200.0, 12.0, 3).unwrap();
        let output = format_loan(&terms, true, &Settings::default());
        assert!(output.contains("Remaining"));
        assert!(output.contains("0.00 ₽"));
    }

    #[test]
    fn test_deposit_quote() {
        let quote = DepositService::quote(Money::from_units(100_000), 12.0, 6).unwrap();
        let output = format_deposit_quote(&quote, 12.0, 6, &Settings::default());
        assert!(output.contains("Interest:     6000.00 ₽"));
        assert!(output.contains("At maturity:  106000.00 ₽"));
    }

    #[test]
    fn test_deposit_list_marks_matured() {
        let opened = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let deposit = Deposit::new("Reserve", Money::from_units(10_000), 10.0, 3, opened, AccountId::new());
        let summary = DepositService::summarize(deposit, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let output = format_deposit_list(&[summary], &Settings::default());
        assert!(output.contains("Reserve (matured)"));
        assert!(output.contains("10.04.2025"));
    }
}
