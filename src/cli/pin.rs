//! PIN lock commands

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::error::{BankError, BankResult};
use crate::services::security::validate_pin;
use crate::services::SecurityService;
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum PinCommands {
    /// Set or change the PIN
    Set,
    /// Remove the PIN (asks for the current one)
    Clear,
    /// Show whether a PIN is set
    Status,
}

pub fn handle_pin_command(storage: &Storage, cmd: PinCommands) -> BankResult<()> {
    let service = SecurityService::new(storage);

    match cmd {
        PinCommands::Set => {
            if service.is_enabled()? {
                let current = prompt_pin("Current PIN: ")?;
                service.unlock(&current)?;
            }
            let pin = prompt_new_pin()?;
            service.set_pin(pin)?;
            println!("PIN set. It will be asked for on every command.");
        }

        PinCommands::Clear => {
            if !service.is_enabled()? {
                println!("No PIN is set.");
                return Ok(());
            }
            let current = prompt_pin("Current PIN: ")?;
            service.clear(current)?;
            println!("PIN removed.");
        }

        PinCommands::Status => {
            if service.is_enabled()? {
                println!("PIN lock: on");
            } else {
                println!("PIN lock: off");
            }
        }
    }

    Ok(())
}

/// Prompt for a new PIN with confirmation
fn prompt_new_pin() -> BankResult<Zeroizing<String>> {
    loop {
        let first = prompt_pin("New PIN (4-6 digits): ")?;
        if let Err(e) = validate_pin(&first) {
            println!("{}. Please try again.", e);
            continue;
        }

        let second = prompt_pin("Confirm PIN: ")?;
        if *first != *second {
            println!("PINs do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Prompt for a PIN (hidden input)
pub fn prompt_pin(prompt: &str) -> BankResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| BankError::Security(format!("Failed to read PIN: {}", e)))
}
