//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_account_details, format_account_list};
use crate::error::{BankError, BankResult};
use crate::models::AccountKind;
use crate::services::AccountService;
use crate::storage::Storage;

use super::parse_money;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Create {
        /// Account name
        name: String,
        /// Account type (card, savings, investment, credit)
        #[arg(short = 't', long = "type", default_value = "card")]
        kind: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        balance: String,
        /// Credit limit, credit accounts only
        #[arg(long)]
        credit_limit: Option<String>,
    },
    /// List all accounts with the net-worth summary
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Annual rate in percent
        #[arg(short, long)]
        rate: Option<f64>,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> BankResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            kind,
            balance,
            credit_limit,
        } => {
            let kind = AccountKind::parse(&kind).ok_or_else(|| {
                BankError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: card, savings, investment, credit",
                    kind
                ))
            })?;
            let opening_balance = parse_money(&balance)?;
            let credit_limit = credit_limit.as_deref().map(parse_money).transpose()?;

            let account = service.create(&name, kind, opening_balance, credit_limit)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.kind);
            println!("  Balance: {}", settings.format_money(account.balance));
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            let overview = service.overview()?;
            println!("{}", format_account_list(&accounts, &overview, settings));
        }

        AccountCommands::Show { account } => {
            let found = service.resolve(&account)?;
            print!("{}", format_account_details(&found, settings));
        }

        AccountCommands::Edit {
            account,
            name,
            rate,
        } => {
            let found = service.resolve(&account)?;

            if name.is_none() && rate.is_none() {
                println!("No changes specified. Use --name or --rate.");
                return Ok(());
            }

            let updated = service.update(found.id, name.as_deref(), rate)?;
            println!("Updated account: {}", updated.name);
        }
    }

    Ok(())
}
