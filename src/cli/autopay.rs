//! Auto-payment commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_auto_payment_list, format_run_outcomes};
use crate::error::{BankError, BankResult};
use crate::models::PaymentFrequency;
use crate::services::{AccountService, AutoPaymentService, AutoPaymentUpdate};
use crate::storage::Storage;

use super::{account_names, parse_date, parse_money, today};

#[derive(Subcommand)]
pub enum AutoPayCommands {
    /// Set up a recurring bill payment
    Add {
        /// Payment name
        name: String,
        /// Amount per payment
        amount: String,
        /// Account to pay from (name or ID)
        #[arg(short, long)]
        account: String,
        /// Frequency (weekly, monthly, quarterly, yearly)
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// First payment date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        next: Option<String>,
        #[arg(short, long, default_value = "Utilities")]
        category: String,
        /// Utility, carrier or merchant being paid
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// List auto-payments
    List,
    /// Change an auto-payment
    Edit {
        /// Auto-payment name or ID
        payment: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        frequency: Option<String>,
        #[arg(long)]
        next: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Pause or resume an auto-payment
    Toggle {
        payment: String,
    },
    #[command(alias = "rm")]
    Remove {
        payment: String,
    },
    /// Show auto-payments due today or earlier
    Due,
    /// Execute every due auto-payment
    Run,
}

fn parse_frequency(input: &str) -> BankResult<PaymentFrequency> {
    PaymentFrequency::parse(input).ok_or_else(|| {
        BankError::Validation(format!(
            "Invalid frequency: '{}'. Use weekly, monthly, quarterly or yearly",
            input
        ))
    })
}

pub fn handle_autopay_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AutoPayCommands,
) -> BankResult<()> {
    let service = AutoPaymentService::new(storage);
    let accounts = AccountService::new(storage);
    let today = today();

    match cmd {
        AutoPayCommands::Add {
            name,
            amount,
            account,
            frequency,
            next,
            category,
            provider,
        } => {
            let payment = service.create(
                &name,
                &category,
                parse_money(&amount)?,
                accounts.resolve(&account)?.id,
                parse_frequency(&frequency)?,
                parse_date(next.as_deref(), today)?,
                provider.as_deref(),
            )?;
            println!(
                "Auto-payment {} set: {} {}, next on {}",
                payment.name,
                settings.format_money(payment.amount),
                payment.frequency,
                settings.format_date(payment.next_payment_date)
            );
        }

        AutoPayCommands::List => {
            let payments = service.list()?;
            println!(
                "{}",
                format_auto_payment_list(&payments, &account_names(storage)?, settings)
            );
        }

        AutoPayCommands::Edit {
            payment,
            name,
            amount,
            account,
            frequency,
            next,
            category,
            provider,
        } => {
            let found = service.resolve(&payment)?;
            let changes = AutoPaymentUpdate {
                name,
                provider,
                category,
                amount: amount.as_deref().map(parse_money).transpose()?,
                account_id: account
                    .as_deref()
                    .map(|a| accounts.resolve(a).map(|acc| acc.id))
                    .transpose()?,
                frequency: frequency.as_deref().map(parse_frequency).transpose()?,
                next_payment_date: next
                    .as_deref()
                    .map(|d| parse_date(Some(d), today))
                    .transpose()?,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated auto-payment: {}", updated.name);
        }

        AutoPayCommands::Toggle { payment } => {
            let found = service.resolve(&payment)?;
            let updated = service.toggle(found.id)?;
            println!(
                "{} is now {}",
                updated.name,
                if updated.enabled { "enabled" } else { "paused" }
            );
        }

        AutoPayCommands::Remove { payment } => {
            let found = service.resolve(&payment)?;
            service.delete(found.id)?;
            println!("Removed auto-payment: {}", found.name);
        }

        AutoPayCommands::Due => {
            let due = service.due(today)?;
            if due.is_empty() {
                println!("No auto-payments due.");
            } else {
                println!(
                    "{}",
                    format_auto_payment_list(&due, &account_names(storage)?, settings)
                );
            }
        }

        AutoPayCommands::Run => {
            let outcomes = service.run_due(today)?;
            print!("{}", format_run_outcomes(&outcomes, settings));
            if outcomes.is_empty() {
                println!();
            }
        }
    }

    Ok(())
}
