//! Loan and deposit commands

use clap::{Args, Subcommand};

use crate::calc::LoanTerms;
use crate::config::Settings;
use crate::display::{format_deposit_list, format_deposit_quote, format_loan};
use crate::error::BankResult;
use crate::services::{AccountService, DepositService};
use crate::storage::Storage;

use super::{parse_money, today};

/// Loan calculator arguments
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(short, long)]
    pub principal: f64,
    /// Annual rate in percent
    #[arg(short, long)]
    pub rate: f64,
    /// Term in months
    #[arg(short, long)]
    pub months: u32,
    /// Print the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn handle_loan_command(settings: &Settings, args: LoanArgs) -> BankResult<()> {
    let terms = LoanTerms::new(args.principal, args.rate, args.months)?;
    print!("{}", format_loan(&terms, args.schedule, settings));
    Ok(())
}

#[derive(Subcommand)]
pub enum DepositCommands {
    /// Estimate deposit income without opening anything
    Calc {
        /// Amount to deposit
        amount: String,
        /// Annual rate in percent
        #[arg(short, long)]
        rate: f64,
        /// Term in months
        #[arg(short, long)]
        months: u32,
    },
    /// Open a deposit funded from an account
    Open {
        /// Deposit name
        name: String,
        /// Amount to deposit
        amount: String,
        #[arg(short, long)]
        rate: f64,
        #[arg(short, long)]
        months: u32,
        /// Funding account name or ID
        #[arg(short, long)]
        from: String,
    },
    /// List opened deposits with accrued interest
    List,
}

pub fn handle_deposit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DepositCommands,
) -> BankResult<()> {
    match cmd {
        DepositCommands::Calc {
            amount,
            rate,
            months,
        } => {
            let quote = DepositService::quote(parse_money(&amount)?, rate, months)?;
            print!("{}", format_deposit_quote(&quote, rate, months, settings));
        }

        DepositCommands::Open {
            name,
            amount,
            rate,
            months,
            from,
        } => {
            let funding = AccountService::new(storage).resolve(&from)?;
            let today = today();
            let deposit = DepositService::new(storage).open(
                &name,
                parse_money(&amount)?,
                rate,
                months,
                funding.id,
                today,
            )?;
            let summary = DepositService::summarize(deposit, today);
            println!(
                "Opened deposit {}: {} at {:.2}% for {} months",
                summary.deposit.name,
                settings.format_money(summary.deposit.principal),
                summary.deposit.rate,
                summary.deposit.term_months
            );
            println!(
                "  Expected interest: {} on {}",
                settings.format_money(summary.expected_interest),
                settings.format_date(summary.maturity_date)
            );
        }

        DepositCommands::List => {
            let deposits = DepositService::new(storage).list(today())?;
            println!("{}", format_deposit_list(&deposits, settings));
        }
    }

    Ok(())
}
