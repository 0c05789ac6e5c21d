//! Money movement commands: transfer, pay and top-up

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_alerts;
use crate::error::BankResult;
use crate::services::{AccountService, LedgerAction, LedgerOutcome, LedgerService, LimitService};
use crate::storage::Storage;

use super::{parse_date, parse_money, today};

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Move money between two of your accounts
    Transfer {
        /// Source account name or ID
        from: String,
        /// Destination account name or ID
        to: String,
        /// Amount to move
        amount: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Pay a merchant or a bill from an account
    Pay {
        /// Account name or ID
        from: String,
        /// Amount to pay
        amount: String,
        /// Who is being paid
        #[arg(short, long)]
        name: String,
        /// Spending category
        #[arg(short, long, default_value = "Payments")]
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Add money to an account from outside
    #[command(name = "topup", alias = "top-up")]
    TopUp {
        /// Account name or ID
        to: String,
        /// Amount to add
        amount: String,
        /// Where the money comes from
        #[arg(short, long, default_value = "card")]
        source: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

pub fn handle_payment_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PaymentCommands,
) -> BankResult<()> {
    let accounts = AccountService::new(storage);
    let today = today();

    let action = match cmd {
        PaymentCommands::Transfer {
            from,
            to,
            amount,
            date,
        } => LedgerAction::Transfer {
            from: accounts.resolve(&from)?.id,
            to: accounts.resolve(&to)?.id,
            amount: parse_money(&amount)?,
            date: parse_date(date.as_deref(), today)?,
        },
        PaymentCommands::Pay {
            from,
            amount,
            name,
            category,
            date,
        } => LedgerAction::Payment {
            from: accounts.resolve(&from)?.id,
            amount: parse_money(&amount)?,
            name,
            category,
            date: parse_date(date.as_deref(), today)?,
        },
        PaymentCommands::TopUp {
            to,
            amount,
            source,
            date,
        } => LedgerAction::TopUp {
            to: accounts.resolve(&to)?.id,
            amount: parse_money(&amount)?,
            source,
            date: parse_date(date.as_deref(), today)?,
        },
    };

    let is_payment = matches!(action, LedgerAction::Payment { .. });
    let outcome = LedgerService::new(storage).apply(action)?;
    print_outcome(&outcome, settings);

    if is_payment {
        let alerts = LimitService::new(storage).alerts(today, &settings.alert_thresholds)?;
        if !alerts.is_empty() {
            println!();
            print!("{}", format_alerts(&alerts, settings));
        }
    }

    Ok(())
}

/// Print the recorded transactions and resulting balances
pub(crate) fn print_outcome(outcome: &LedgerOutcome, settings: &Settings) {
    for txn in &outcome.transactions {
        println!(
            "Recorded: {} {} ({})",
            txn.name,
            settings.format_money(txn.signed_amount()),
            txn.id
        );
    }
    for account in &outcome.accounts {
        println!(
            "  {} balance: {}",
            account.name,
            settings.format_money(account.balance)
        );
    }
}
