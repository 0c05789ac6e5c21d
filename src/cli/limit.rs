//! Spending limit and alert commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_alerts, format_limit_status};
use crate::error::{BankError, BankResult};
use crate::services::LimitService;
use crate::storage::Storage;

use super::{parse_money, today};

#[derive(Subcommand)]
pub enum LimitCommands {
    /// Cap monthly spending in a category
    Add {
        /// Category name
        category: String,
        /// Monthly limit
        amount: String,
    },
    /// Show limits with this month's usage
    List,
    /// Change a limit
    Edit {
        /// Limit category or ID
        limit: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
    },
    /// Switch a limit on or off
    Toggle {
        /// Limit category or ID
        limit: String,
    },
    /// Remove a limit
    #[command(alias = "rm")]
    Remove {
        /// Limit category or ID
        limit: String,
    },
    /// Show active alerts
    Alerts,
    /// Hide an alert until the limits change
    Dismiss {
        /// Category whose alert to dismiss
        category: Option<String>,
        /// Dismiss every active alert
        #[arg(long, conflicts_with = "category")]
        all: bool,
    },
}

pub fn handle_limit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LimitCommands,
) -> BankResult<()> {
    let service = LimitService::new(storage);
    let thresholds = &settings.alert_thresholds;

    match cmd {
        LimitCommands::Add { category, amount } => {
            let limit = service.create(&category, parse_money(&amount)?)?;
            println!(
                "Limit set: {} {} per month",
                limit.category,
                settings.format_money(limit.limit)
            );
        }

        LimitCommands::List => {
            let statuses = service.status(today(), thresholds)?;
            println!("{}", format_limit_status(&statuses, settings));
        }

        LimitCommands::Edit {
            limit,
            category,
            amount,
        } => {
            let found = service.resolve(&limit)?;
            if category.is_none() && amount.is_none() {
                println!("No changes specified. Use --category or --amount.");
                return Ok(());
            }
            let amount = amount.as_deref().map(parse_money).transpose()?;
            let updated = service.update(found.id, category.as_deref(), amount)?;
            println!(
                "Updated limit: {} {}",
                updated.category,
                settings.format_money(updated.limit)
            );
        }

        LimitCommands::Toggle { limit } => {
            let found = service.resolve(&limit)?;
            let updated = service.toggle(found.id)?;
            println!(
                "Limit for {} is now {}",
                updated.category,
                if updated.enabled { "on" } else { "off" }
            );
        }

        LimitCommands::Remove { limit } => {
            let found = service.resolve(&limit)?;
            service.delete(found.id)?;
            println!("Removed limit: {}", found.category);
        }

        LimitCommands::Alerts => {
            let alerts = service.alerts(today(), thresholds)?;
            print!("{}", format_alerts(&alerts, settings));
            if alerts.is_empty() {
                println!();
            }
        }

        LimitCommands::Dismiss { category, all } => {
            if all {
                let count = service.dismiss_all(today(), thresholds)?;
                println!("Dismissed {} alert(s)", count);
            } else {
                let category = category.ok_or_else(|| {
                    BankError::Validation("Name a category or pass --all".into())
                })?;
                if service.dismiss(&category, today(), thresholds)? {
                    println!("Dismissed alert for {}", category);
                } else {
                    println!("No active alert for {}", category);
                }
            }
        }
    }

    Ok(())
}
