//! Export module for minibank
//!
//! - CSV: transactions and accounts for spreadsheets
//! - JSON: machine-readable full export
//! - YAML: human-readable full export
//! - Statement: plain-text account statement for a period

pub mod csv;
pub mod json;
pub mod statement;
pub mod yaml;

pub use csv::{export_accounts_csv, export_transactions_csv, write_transactions_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use statement::{build_statement, Statement};
pub use yaml::{export_full_yaml, import_from_yaml};
