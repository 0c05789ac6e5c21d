//! Account display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::Account;
use crate::services::BalanceOverview;

use super::render_table;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Card")]
    card: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Available")]
    available: String,
}

/// Accounts as a table followed by the net-worth summary
pub fn format_account_list(
    accounts: &[Account],
    overview: &BalanceOverview,
    settings: &Settings,
) -> String {
    if accounts.is_empty() {
        return "No accounts found. Run `minibank init` to create the demo accounts.".to_string();
    }

    let rows: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            name: a.name.clone(),
            kind: a.kind.to_string(),
            card: a.masked_card_number().unwrap_or_default(),
            rate: a.rate.map(|r| format!("{:.1}%", r)).unwrap_or_default(),
            balance: settings.format_money(a.balance),
            available: a
                .available()
                .map(|m| settings.format_money(m))
                .unwrap_or_else(|| "no limit".to_string()),
        })
        .collect();

    let mut output = render_table(rows, 3);
    output.push('\n');
    output.push_str(&format!("\n  Assets:     {}\n", settings.format_money(overview.assets)));
    output.push_str(&format!("  Debt:       {}\n", settings.format_money(overview.debt)));
    output.push_str(&format!("  Net worth:  {}\n", settings.format_money(overview.net_worth)));
    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:           {}\n", account.kind));
    output.push_str(&format!("  ID:             {}\n", account.id));
    output.push_str(&format!("  Balance:        {}\n", settings.format_money(account.balance)));
    if let Some(card) = account.masked_card_number() {
        output.push_str(&format!("  Card:           {}\n", card));
    }
    if let Some(rate) = account.rate {
        output.push_str(&format!("  Rate:           {:.2}%\n", rate));
    }
    if let Some(limit) = account.credit_limit {
        output.push_str(&format!("  Credit limit:   {}\n", settings.format_money(limit)));
    }
    if let Some(available) = account.available() {
        output.push_str(&format!("  Available:      {}\n", settings.format_money(available)));
    }
    output.push_str(&format!(
        "  Opened:         {}\n",
        settings.format_date(account.created_at.date_naive())
    ));

    output
}
