//! CLI commands for data export
//!
//! Every export writes to the given file, or to stdout when none is given.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::settings::CsvDelimiter;
use crate::config::Settings;
use crate::error::{BankError, BankResult};
use crate::export::{
    export_accounts_csv, export_full_json, export_full_yaml, export_transactions_csv,
};
use crate::storage::Storage;

use super::today;
use super::transaction::FilterArgs;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export transactions to CSV
    Csv {
        /// Output file path, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
        /// Field delimiter (semicolon or comma), defaults to the configured one
        #[arg(long)]
        delimiter: Option<String>,
    },
    /// Export account balances to CSV
    Accounts {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        delimiter: Option<String>,
    },
    /// Export everything as JSON
    Json {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Export everything as YAML
    Yaml {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&Path>) -> BankResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BankError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn resolve_delimiter(input: Option<&str>, settings: &Settings) -> BankResult<CsvDelimiter> {
    match input {
        None => Ok(settings.csv_delimiter),
        Some(raw) => CsvDelimiter::parse(raw).ok_or_else(|| {
            BankError::Validation(format!(
                "Invalid delimiter: '{}'. Use semicolon or comma",
                raw
            ))
        }),
    }
}

/// Report where the export went, on stderr so stdout stays clean
fn report(output: Option<&Path>, what: &str) {
    if let Some(path) = output {
        eprintln!("Exported {} to: {}", what, path.display());
    }
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> BankResult<()> {
    match cmd {
        ExportCommands::Csv {
            output,
            filter,
            delimiter,
        } => {
            let delimiter = resolve_delimiter(delimiter.as_deref(), settings)?;
            let filter = filter.to_filter(storage)?;
            let mut writer = open_output(output.as_deref())?;
            let count =
                export_transactions_csv(storage, &filter, today(), &mut writer, delimiter)?;
            writer.flush()?;
            report(output.as_deref(), &format!("{} transactions", count));
        }

        ExportCommands::Accounts { output, delimiter } => {
            let delimiter = resolve_delimiter(delimiter.as_deref(), settings)?;
            let mut writer = open_output(output.as_deref())?;
            export_accounts_csv(storage, &mut writer, delimiter)?;
            writer.flush()?;
            report(
                output.as_deref(),
                &format!("{} accounts", storage.accounts.count()?),
            );
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_json(storage, &mut writer, pretty)?;
            writeln!(writer)?;
            writer.flush()?;
            report(output.as_deref(), "all data");
        }

        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_yaml(storage, &mut writer)?;
            writer.flush()?;
            report(output.as_deref(), "all data");
        }
    }

    Ok(())
}
