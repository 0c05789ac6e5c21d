//! CLI commands for data import
//!
//! `legacy` merges a browser local-storage dump; `restore` replaces all
//! data with a previous JSON or YAML export.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{BankError, BankResult};
use crate::export::{import_from_json, import_from_yaml};
use crate::services::ImportService;
use crate::storage::Storage;

use super::today;

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Merge a local-storage dump from the web app
    Legacy {
        /// JSON file holding the dumped keys
        file: PathBuf,
    },
    /// Replace all data with a `minibank export json|yaml` file
    Restore {
        file: PathBuf,
        /// Required, since every record is overwritten
        #[arg(long)]
        yes: bool,
    },
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, cmd: ImportCommands) -> BankResult<()> {
    match cmd {
        ImportCommands::Legacy { file } => import_legacy(storage, &file),
        ImportCommands::Restore { file, yes } => restore(storage, &file, yes),
    }
}

fn import_legacy(storage: &Storage, file: &Path) -> BankResult<()> {
    if !file.exists() {
        return Err(BankError::Import(format!("File not found: {}", file.display())));
    }

    let result = ImportService::new(storage).import_file(file, today())?;

    println!("Import from {}", file.display());
    println!("{}", "=".repeat(40));
    println!("  Spending limits:    {}", result.limits);
    println!("  Budgets:            {}", result.budgets);
    println!("  Subscriptions:      {}", result.subscriptions);
    println!("  Auto-payments:      {}", result.auto_payments);
    println!("  Payment templates:  {}", result.templates);
    println!("  Skipped:            {}", result.skipped);

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    println!();
    println!("Imported {} record(s).", result.total());
    Ok(())
}

fn restore(storage: &Storage, file: &Path, confirmed: bool) -> BankResult<()> {
    if !confirmed {
        return Err(BankError::Validation(
            "Restoring overwrites all accounts and history. Re-run with --yes to continue".into(),
        ));
    }

    let contents = std::fs::read_to_string(file)
        .map_err(|e| BankError::Import(format!("Failed to read {}: {}", file.display(), e)))?;

    let is_yaml = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let export = if is_yaml {
        import_from_yaml(&contents)?
    } else {
        import_from_json(&contents)?
    };

    let exported_at = export.exported_at;
    let count = export.restore_into(storage)?;
    println!(
        "Restored {} record(s) from the export of {}",
        count,
        exported_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}
