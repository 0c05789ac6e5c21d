//! Transaction display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{AccountId, Transaction};

use super::render_table;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Transactions as a table, amounts signed
pub fn format_transaction_list(
    transactions: &[Transaction],
    account_names: &HashMap<AccountId, String>,
    settings: &Settings,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|t| {
            let amount = settings.format_money(t.amount);
            TransactionRow {
                id: t.id.to_string(),
                date: settings.format_date(t.date),
                account: account_names
                    .get(&t.account_id)
                    .cloned()
                    .unwrap_or_else(|| "?".to_string()),
                name: t.name.clone(),
                category: t.category.clone(),
                amount: if t.is_incoming {
                    format!("+{}", amount)
                } else {
                    format!("-{}", amount)
                },
            }
        })
        .collect();

    let mut output = render_table(rows, 5);
    output.push_str(&format!("\n{} transaction(s)\n", transactions.len()));
    output
}

/// Format a single transaction's details
pub fn format_transaction_details(
    txn: &Transaction,
    account_name: &str,
    linked: Option<(&Transaction, &str)>,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.name));
    output.push_str(&format!("  ID:         {}\n", txn.id));
    output.push_str(&format!("  Date:       {}\n", settings.format_date(txn.date)));
    output.push_str(&format!("  Account:    {}\n", account_name));
    output.push_str(&format!("  Category:   {}\n", txn.category));
    output.push_str(&format!("  Direction:  {}\n", txn.direction()));
    output.push_str(&format!(
        "  Amount:     {}\n",
        settings.format_money(txn.signed_amount())
    ));
    if let Some((other, other_account)) = linked {
        output.push_str(&format!("  Linked:     {} on {}\n", other.id, other_account));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_list_signs_amounts() {
        let account = AccountId::new();
        let names = HashMap::from([(account, "Main card".to_string())]);
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        let txns = vec![
            Transaction::outgoing(account, "Coffee", "Cafe", Money::from_units(350), date),
            Transaction::incoming(account, "Salary", "Salary", Money::from_units(95_000), date),
        ];

        let output = format_transaction_list(&txns, &names, &Settings::default());
        assert!(output.contains("-350.00 ₽"));
        assert!(output.contains("+95000.00 ₽"));
        assert!(output.contains("03.10.2026"));
        assert!(output.contains("2 transaction(s)"));
    }

    #[test]
    fn test_details() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        let txn = Transaction::outgoing(AccountId::new(), "Coffee", "Cafe", Money::from_units(350), date);
        let output = format_transaction_details(&txn, "Main card", None, &Settings::default());
        assert!(output.contains("Direction:  out"));
        assert!(output.contains("Amount:     -350.00 ₽"));
    }
}
