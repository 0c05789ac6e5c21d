//! Subscription tracking commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_subscription_list, format_upcoming};
use crate::error::{BankError, BankResult};
use crate::models::BillingCycle;
use crate::services::{SubscriptionService, SubscriptionUpdate};
use crate::storage::Storage;

use super::{parse_date, parse_money, today};

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Track a new subscription
    Add {
        /// Service name
        name: String,
        /// Amount per billing cycle
        amount: String,
        /// Billing cycle (weekly, monthly, yearly)
        #[arg(long, default_value = "monthly")]
        cycle: String,
        /// Next billing date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        next: Option<String>,
        /// Spending category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List subscriptions with the monthly total
    List,
    /// Charges due within the next days
    Upcoming {
        /// Window in days, defaults to the configured value
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Change a subscription
    Edit {
        /// Subscription name or ID
        subscription: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long)]
        cycle: Option<String>,
        #[arg(long)]
        next: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Pause or resume a subscription
    Toggle {
        subscription: String,
    },
    /// Stop tracking a subscription
    #[command(alias = "rm")]
    Remove {
        subscription: String,
    },
    /// Move billing dates that have passed to their next occurrence
    Roll,
}

fn parse_cycle(input: &str) -> BankResult<BillingCycle> {
    BillingCycle::parse(input).ok_or_else(|| {
        BankError::Validation(format!(
            "Invalid billing cycle: '{}'. Use weekly, monthly or yearly",
            input
        ))
    })
}

pub fn handle_subscription_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SubscriptionCommands,
) -> BankResult<()> {
    let service = SubscriptionService::new(storage);
    let today = today();

    match cmd {
        SubscriptionCommands::Add {
            name,
            amount,
            cycle,
            next,
            category,
        } => {
            let subscription = service.create(
                &name,
                parse_money(&amount)?,
                parse_cycle(&cycle)?,
                parse_date(next.as_deref(), today)?,
                category.as_deref(),
            )?;
            println!(
                "Tracking {}: {} {}, next charge {}",
                subscription.name,
                settings.format_money(subscription.amount),
                subscription.cycle,
                settings.format_date(subscription.next_billing_date)
            );
        }

        SubscriptionCommands::List => {
            let subscriptions = service.list()?;
            let total = service.total_monthly()?;
            println!("{}", format_subscription_list(&subscriptions, total, settings));
        }

        SubscriptionCommands::Upcoming { days } => {
            let days = days.unwrap_or(settings.upcoming_days);
            let charges = service.upcoming(today, days)?;
            println!("{}", format_upcoming(&charges, days, settings));
        }

        SubscriptionCommands::Edit {
            subscription,
            name,
            amount,
            cycle,
            next,
            category,
        } => {
            let found = service.resolve(&subscription)?;
            let changes = SubscriptionUpdate {
                name,
                amount: amount.as_deref().map(parse_money).transpose()?,
                cycle: cycle.as_deref().map(parse_cycle).transpose()?,
                next_billing_date: next
                    .as_deref()
                    .map(|d| parse_date(Some(d), today))
                    .transpose()?,
                category,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated subscription: {}", updated.name);
        }

        SubscriptionCommands::Toggle { subscription } => {
            let found = service.resolve(&subscription)?;
            let updated = service.toggle(found.id)?;
            println!(
                "{} is now {}",
                updated.name,
                if updated.active { "active" } else { "paused" }
            );
        }

        SubscriptionCommands::Remove { subscription } => {
            let found = service.resolve(&subscription)?;
            service.delete(found.id)?;
            println!("Removed subscription: {}", found.name);
        }

        SubscriptionCommands::Roll => {
            let rolled = service.roll_forward(today)?;
            if rolled.is_empty() {
                println!("All billing dates are current.");
            }
            for subscription in rolled {
                println!(
                    "{}: next charge {}",
                    subscription.name,
                    settings.format_date(subscription.next_billing_date)
                );
            }
        }
    }

    Ok(())
}
