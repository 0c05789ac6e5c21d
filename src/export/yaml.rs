//! YAML Export functionality
//!
//! The same document as the JSON export, in a form that is easier to read.

use std::io::Write;

use crate::error::{BankError, BankResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export everything to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> BankResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# minibank data export").map_err(|e| BankError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BankError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| BankError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BankError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BankError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> BankResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BankError::Import(e.to_string()))?;
    export.validate().map_err(BankError::Import)?;
    Ok(export)
}
