use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use minibank_cli::cli::{
    handle_account_command, handle_analytics_command, handle_audit_command,
    handle_autopay_command, handle_budget_command, handle_deposit_command,
    handle_export_command, handle_import_command, handle_limit_command, handle_loan_command,
    handle_payment_command, handle_pin_command, handle_statement_command,
    handle_subscription_command, handle_template_command, handle_transaction_command,
    prompt_pin, today,
};
use minibank_cli::config::{BankPaths, Settings};
use minibank_cli::display::format_alerts;
use minibank_cli::services::{LimitService, SecurityService};
use minibank_cli::storage::{initialize_storage, seed_demo_data, Storage};

#[derive(Parser)]
#[command(
    name = "minibank",
    version,
    about = "Personal banking from the terminal",
    long_about = "minibank keeps your accounts, payments, budgets, spending limits, \
                  subscriptions and deposits in a local data directory, with loan and \
                  deposit calculators and CSV/JSON/YAML export."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// PIN for a locked store (prompted for when omitted)
    #[arg(long, env = "MINIBANK_PIN", global = true, hide_env_values = true)]
    pin: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and the demo accounts
    Init {
        /// Only create the directory, without demo data
        #[arg(long)]
        empty: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Account management commands
    #[command(subcommand)]
    Account(minibank_cli::cli::AccountCommands),

    #[command(flatten)]
    Payment(minibank_cli::cli::PaymentCommands),

    /// Transaction history
    #[command(subcommand, alias = "txn")]
    Transaction(minibank_cli::cli::TransactionCommands),

    /// Monthly category budgets
    #[command(subcommand)]
    Budget(minibank_cli::cli::BudgetCommands),

    /// Spending limits and alerts
    #[command(subcommand)]
    Limit(minibank_cli::cli::LimitCommands),

    /// Subscription tracking
    #[command(subcommand, alias = "sub")]
    Subscription(minibank_cli::cli::SubscriptionCommands),

    /// Recurring bill payments
    #[command(subcommand)]
    Autopay(minibank_cli::cli::AutoPayCommands),

    /// Saved payment templates
    #[command(subcommand)]
    Template(minibank_cli::cli::TemplateCommands),

    /// Loan payment calculator
    Loan(minibank_cli::cli::LoanArgs),

    /// Deposits and the deposit calculator
    #[command(subcommand)]
    Deposit(minibank_cli::cli::DepositCommands),

    /// Income and spending breakdown
    Analytics(minibank_cli::cli::AnalyticsArgs),

    /// Account statement for a period
    Statement(minibank_cli::cli::StatementArgs),

    /// Export data
    #[command(subcommand)]
    Export(minibank_cli::cli::ExportCommands),

    /// Import data
    #[command(subcommand)]
    Import(minibank_cli::cli::ImportCommands),

    /// PIN lock
    #[command(subcommand)]
    Pin(minibank_cli::cli::PinCommands),

    /// Show recent audit log entries
    Audit(minibank_cli::cli::AuditArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change a setting
    Set {
        /// currency, date-format, csv-delimiter, warning-percent, exceeded-percent or upcoming-days
        key: String,
        value: String,
    },
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Stop unless the PIN (when one is set) is supplied correctly
fn unlock(storage: &Storage, pin: Option<&str>) -> Result<()> {
    let security = SecurityService::new(storage);
    if !security.is_enabled()? {
        return Ok(());
    }
    match pin {
        Some(pin) => security.unlock(pin)?,
        None => {
            let entered = prompt_pin("PIN: ")?;
            security.unlock(&entered)?;
        }
    }
    debug!("store unlocked");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // Initialize paths and settings
    let paths = BankPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // The calculator needs no data and no PIN
    let command = match cli.command {
        Some(Commands::Loan(args)) => {
            handle_loan_command(&settings, args)?;
            return Ok(());
        }
        other => other,
    };

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    unlock(&storage, cli.pin.as_deref())?;

    match command {
        Some(Commands::Init { empty }) => {
            println!("Initializing minibank at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            if empty {
                println!("Initialization complete!");
            } else {
                let created = seed_demo_data(&storage, today())?;
                if created == 0 {
                    println!("Accounts already exist; demo data was not added.");
                } else {
                    println!("Created {} demo accounts with recent card history.", created);
                }
                println!();
                println!("Run 'minibank account list' to see them.");
            }
        }
        Some(Commands::Config { action }) => match action {
            Some(ConfigCommands::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
            Some(ConfigCommands::Show) | None => {
                println!("minibank Configuration");
                println!("======================");
                println!("Base directory:   {}", paths.base_dir().display());
                println!("Data directory:   {}", paths.data_dir().display());
                println!("Audit log:        {}", paths.audit_log().display());
                println!();
                println!("Settings:");
                println!("  currency:          {}", settings.currency_symbol);
                println!("  date-format:       {}", settings.date_format);
                println!("  csv-delimiter:     {:?}", settings.csv_delimiter);
                println!("  warning-percent:   {}", settings.alert_thresholds.warning_percent);
                println!("  exceeded-percent:  {}", settings.alert_thresholds.exceeded_percent);
                println!("  upcoming-days:     {}", settings.upcoming_days);
            }
        },
        Some(Commands::Account(cmd)) => handle_account_command(&storage, &settings, cmd)?,
        Some(Commands::Payment(cmd)) => handle_payment_command(&storage, &settings, cmd)?,
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?
        }
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Limit(cmd)) => handle_limit_command(&storage, &settings, cmd)?,
        Some(Commands::Subscription(cmd)) => {
            handle_subscription_command(&storage, &settings, cmd)?
        }
        Some(Commands::Autopay(cmd)) => handle_autopay_command(&storage, &settings, cmd)?,
        Some(Commands::Template(cmd)) => handle_template_command(&storage, &settings, cmd)?,
        Some(Commands::Deposit(cmd)) => handle_deposit_command(&storage, &settings, cmd)?,
        Some(Commands::Analytics(args)) => handle_analytics_command(&storage, &settings, args)?,
        Some(Commands::Statement(args)) => handle_statement_command(&storage, &settings, args)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&storage, cmd)?,
        Some(Commands::Pin(cmd)) => handle_pin_command(&storage, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        Some(Commands::Loan(args)) => handle_loan_command(&settings, args)?,
        None => {
            println!("minibank - personal banking from the terminal");
            println!();
            if storage.has_accounts()? {
                let alerts = LimitService::new(&storage).alerts(today(), &settings.alert_thresholds)?;
                if !alerts.is_empty() {
                    print!("{}", format_alerts(&alerts, &settings));
                    println!();
                }
            } else {
                println!("Run 'minibank init' to create the demo accounts.");
            }
            println!("Run 'minibank --help' for usage information.");
        }
    }

    Ok(())
}
