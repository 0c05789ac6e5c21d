//! Analytics, statement and audit log commands

use clap::Args;

use crate::config::Settings;
use crate::display::{format_analytics, format_audit_entries, format_statement};
use crate::error::BankResult;
use crate::export::build_statement;
use crate::services::{AccountService, AnalyticsService};
use crate::storage::Storage;

use super::{parse_period, today};

#[derive(Args)]
pub struct AnalyticsArgs {
    /// Period: current, 1, 2, 3 or all
    #[arg(short, long, default_value = "current")]
    pub period: String,
    /// Only this account (name or ID)
    #[arg(short, long)]
    pub account: Option<String>,
}

#[derive(Args)]
pub struct StatementArgs {
    /// Account name or ID
    pub account: String,
    /// Period: current, 1, 2, 3 or all
    #[arg(short, long, default_value = "current")]
    pub period: String,
}

#[derive(Args)]
pub struct AuditArgs {
    /// Number of most recent entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

pub fn handle_analytics_command(
    storage: &Storage,
    settings: &Settings,
    args: AnalyticsArgs,
) -> BankResult<()> {
    let period = parse_period(&args.period)?;
    let account_id = args
        .account
        .as_deref()
        .map(|a| AccountService::new(storage).resolve(a).map(|acc| acc.id))
        .transpose()?;
    let report = AnalyticsService::new(storage).report(period, account_id, today())?;
    print!("{}", format_analytics(&report, settings));
    Ok(())
}

pub fn handle_statement_command(
    storage: &Storage,
    settings: &Settings,
    args: StatementArgs,
) -> BankResult<()> {
    let account = AccountService::new(storage).resolve(&args.account)?;
    let statement = build_statement(storage, account.id, parse_period(&args.period)?, today())?;
    print!("{}", format_statement(&statement, settings));
    Ok(())
}

pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> BankResult<()> {
    let entries = storage.audit().read_recent(args.limit)?;
    println!("{}", format_audit_entries(&entries));
    Ok(())
}
