//! Transaction history commands

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_list};
use crate::error::{BankError, BankResult};
use crate::models::{Direction, Transaction};
use crate::services::{AccountService, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{account_names, parse_period, today};

/// History filters shared by `txn list` and `export csv`
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Only this account (name or ID)
    #[arg(short, long)]
    pub account: Option<String>,
    /// Category (case-insensitive, substring match)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Direction: in or out
    #[arg(long)]
    pub direction: Option<String>,
    /// Period: current, 1, 2, 3 or all
    #[arg(short, long, default_value = "all")]
    pub period: String,
    /// Text to look for in the transaction name
    #[arg(short, long)]
    pub search: Option<String>,
}

impl FilterArgs {
    /// Resolve names and parse the period into a service filter
    pub fn to_filter(&self, storage: &Storage) -> BankResult<TransactionFilter> {
        let mut filter = TransactionFilter::new().period(parse_period(&self.period)?);
        if let Some(account) = &self.account {
            filter = filter.account(AccountService::new(storage).resolve(account)?.id);
        }
        if let Some(category) = &self.category {
            filter = filter.category(category.as_str());
        }
        if let Some(direction) = &self.direction {
            filter = filter.direction(parse_direction(direction)?);
        }
        if let Some(search) = &self.search {
            filter = filter.search(search.as_str());
        }
        Ok(filter)
    }
}

fn parse_direction(input: &str) -> BankResult<Direction> {
    match input.trim().to_lowercase().as_str() {
        "in" | "incoming" => Ok(Direction::Incoming),
        "out" | "outgoing" => Ok(Direction::Outgoing),
        _ => Err(BankError::Validation(format!(
            "Invalid direction: '{}'. Use in or out",
            input
        ))),
    }
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of transactions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction
    Show {
        /// Transaction ID (full or prefix)
        id: String,
    },
    /// List the categories used in the history
    Categories,
}

pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BankResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::List { filter, limit } => {
            let filter = filter.to_filter(storage)?.limit(limit);
            let transactions = service.list(&filter, today())?;
            println!(
                "{}",
                format_transaction_list(&transactions, &account_names(storage)?, settings)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&id)?;
            let names = account_names(storage)?;
            let name_of = |t: &Transaction| {
                names
                    .get(&t.account_id)
                    .cloned()
                    .unwrap_or_else(|| t.account_id.to_string())
            };
            let linked = service.linked(&txn)?;
            let linked_name = linked.as_ref().map(name_of);
            let linked_ref = linked.as_ref().zip(linked_name.as_deref());
            print!(
                "{}",
                format_transaction_details(&txn, &name_of(&txn), linked_ref, settings)
            );
        }

        TransactionCommands::Categories => {
            let categories = service.categories()?;
            if categories.is_empty() {
                println!("No categories yet.");
            }
            for category in categories {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("IN").unwrap(), Direction::Incoming);
        assert_eq!(parse_direction("out").unwrap(), Direction::Outgoing);
        assert!(parse_direction("sideways").is_err());
    }
}
