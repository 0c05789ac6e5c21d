//! Budget CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_budget_status;
use crate::error::BankResult;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_money, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a monthly budget for a category
    Add {
        /// Category name
        category: String,
        /// Monthly amount
        amount: String,
        /// Display color, e.g. "#4caf50"
        #[arg(long)]
        color: Option<String>,
    },
    /// Show budgets with this month's spending
    #[command(alias = "status")]
    List,
    /// Change a budget
    Edit {
        /// Budget category or ID
        budget: String,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New monthly amount
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a budget
    #[command(alias = "rm")]
    Remove {
        /// Budget category or ID
        budget: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BankResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Add {
            category,
            amount,
            color,
        } => {
            let budget = service.create(&category, parse_money(&amount)?, color)?;
            println!(
                "Budget set: {} {} per month",
                budget.category,
                settings.format_money(budget.amount)
            );
        }

        BudgetCommands::List => {
            let statuses = service.status(today(), &settings.alert_thresholds)?;
            println!("{}", format_budget_status(&statuses, settings));
        }

        BudgetCommands::Edit {
            budget,
            category,
            amount,
            color,
        } => {
            let found = service.resolve(&budget)?;
            if category.is_none() && amount.is_none() && color.is_none() {
                println!("No changes specified. Use --category, --amount or --color.");
                return Ok(());
            }
            let amount = amount.as_deref().map(parse_money).transpose()?;
            let updated = service.update(found.id, category.as_deref(), amount, color)?;
            println!(
                "Updated budget: {} {}",
                updated.category,
                settings.format_money(updated.amount)
            );
        }

        BudgetCommands::Remove { budget } => {
            let found = service.resolve(&budget)?;
            service.delete(found.id)?;
            println!("Removed budget: {}", found.category);
        }
    }

    Ok(())
}
