//! minibank - personal banking from the terminal
//!
//! This library provides the core of the minibank application: accounts and
//! their transaction history, payments and transfers, monthly budgets and
//! spending limits with alerts, subscriptions, auto-payments, payment
//! templates, deposits, and loan/deposit calculators.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, budgets, etc.)
//! - `storage`: Versioned JSON file storage with migrations
//! - `services`: Business logic layer; all balance changes go through the ledger
//! - `calc`: Loan, deposit and alert arithmetic
//! - `audit`: Audit logging system
//! - `export`: CSV, JSON and YAML exports and account statements
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `minibank` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use minibank_cli::config::{BankPaths, Settings};
//! use minibank_cli::storage::Storage;
//!
//! let paths = BankPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod calc;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BankError, BankResult};
