//! Payment template commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_template_list;
use crate::error::BankResult;
use crate::services::{AccountService, TemplateService, TemplateUpdate};
use crate::storage::Storage;

use super::payment::print_outcome;
use super::{account_names, parse_date, parse_money, today};

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Save a reusable payment
    Add {
        /// Template name
        name: String,
        /// Spending category
        #[arg(short, long, default_value = "Payments")]
        category: String,
        /// Phone, contract number or merchant
        #[arg(short, long)]
        recipient: Option<String>,
        /// Default amount
        #[arg(long)]
        amount: Option<String>,
        /// Default account to pay from
        #[arg(short, long)]
        account: Option<String>,
    },
    /// List saved templates
    List,
    /// Change a template
    Edit {
        /// Template name or ID
        template: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        recipient: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
    },
    #[command(alias = "rm")]
    Remove {
        template: String,
    },
    /// Pay using a template
    Use {
        /// Template name or ID
        template: String,
        /// Amount, overrides the template's default
        #[arg(long)]
        amount: Option<String>,
        /// Account, overrides the template's default
        #[arg(short, long)]
        account: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

pub fn handle_template_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TemplateCommands,
) -> BankResult<()> {
    let service = TemplateService::new(storage);
    let accounts = AccountService::new(storage);
    let resolve_account = |name: Option<String>| {
        name.as_deref()
            .map(|a| accounts.resolve(a).map(|acc| acc.id))
            .transpose()
    };

    match cmd {
        TemplateCommands::Add {
            name,
            category,
            recipient,
            amount,
            account,
        } => {
            let template = service.create(
                &name,
                &category,
                recipient.as_deref(),
                amount.as_deref().map(parse_money).transpose()?,
                resolve_account(account)?,
            )?;
            println!("Saved template: {}", template.name);
        }

        TemplateCommands::List => {
            let templates = service.list()?;
            println!(
                "{}",
                format_template_list(&templates, &account_names(storage)?, settings)
            );
        }

        TemplateCommands::Edit {
            template,
            name,
            category,
            recipient,
            amount,
            account,
        } => {
            let found = service.resolve(&template)?;
            let changes = TemplateUpdate {
                name,
                recipient,
                category,
                amount: amount.as_deref().map(parse_money).transpose()?,
                account_id: resolve_account(account)?,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated template: {}", updated.name);
        }

        TemplateCommands::Remove { template } => {
            let found = service.resolve(&template)?;
            service.delete(found.id)?;
            println!("Removed template: {}", found.name);
        }

        TemplateCommands::Use {
            template,
            amount,
            account,
            date,
        } => {
            let found = service.resolve(&template)?;
            let outcome = service.use_template(
                found.id,
                amount.as_deref().map(parse_money).transpose()?,
                resolve_account(account)?,
                parse_date(date.as_deref(), today())?,
            )?;
            print_outcome(&outcome, settings);
        }
    }

    Ok(())
}
