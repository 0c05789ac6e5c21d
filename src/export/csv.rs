//! CSV Export functionality
//!
//! Spreadsheet-friendly transaction and account exports. Files start with a
//! UTF-8 byte order mark so spreadsheet programs pick the right encoding, and
//! use `;` by default, which is what locales with a decimal comma expect.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::config::settings::CsvDelimiter;
use crate::error::{BankError, BankResult};
use crate::models::{AccountId, Transaction};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

/// UTF-8 byte order mark
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column headers of the transaction export
pub const TRANSACTION_HEADERS: [&str; 6] =
    ["Date", "Account", "Name", "Category", "Direction", "Amount"];

fn export_err(e: impl std::fmt::Display) -> BankError {
    BankError::Export(e.to_string())
}

fn csv_writer<W: Write>(writer: &mut W, delimiter: CsvDelimiter) -> BankResult<csv::Writer<&mut W>> {
    writer.write_all(BOM).map_err(export_err)?;
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(writer))
}

/// Write transactions as CSV
///
/// Amounts carry their sign and two decimals; dates are ISO-8601. An empty
/// list still produces the BOM and the header row.
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    account_names: &HashMap<AccountId, String>,
    writer: &mut W,
    delimiter: CsvDelimiter,
) -> BankResult<()> {
    let mut csv = csv_writer(writer, delimiter)?;
    csv.write_record(TRANSACTION_HEADERS).map_err(export_err)?;

    for txn in transactions {
        let account = account_names
            .get(&txn.account_id)
            .map(String::as_str)
            .unwrap_or("Unknown");
        csv.write_record([
            txn.date.format("%Y-%m-%d").to_string().as_str(),
            account,
            txn.name.as_str(),
            txn.category.as_str(),
            txn.direction().to_string().as_str(),
            txn.signed_amount().to_decimal_string().as_str(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Export transactions matching `filter` from storage, newest first
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    filter: &TransactionFilter,
    today: NaiveDate,
    writer: &mut W,
    delimiter: CsvDelimiter,
) -> BankResult<usize> {
    let transactions = TransactionService::new(storage).list(filter, today)?;
    let account_names: HashMap<_, _> = storage
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    write_transactions_csv(&transactions, &account_names, writer, delimiter)?;
    Ok(transactions.len())
}

/// Export account balances to CSV
pub fn export_accounts_csv<W: Write>(
    storage: &Storage,
    writer: &mut W,
    delimiter: CsvDelimiter,
) -> BankResult<()> {
    let mut csv = csv_writer(writer, delimiter)?;
    csv.write_record(["Name", "Type", "Balance", "Card", "Rate", "Credit Limit"])
        .map_err(export_err)?;

    for account in storage.accounts.get_sorted()? {
        csv.write_record([
            account.name.clone(),
            account.kind.to_string(),
            account.balance.to_decimal_string(),
            account.masked_card_number().unwrap_or_default(),
            account.rate.map(|r| format!("{:.2}", r)).unwrap_or_default(),
            account
                .credit_limit
                .map(|l| l.to_decimal_string())
                .unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind, Money};
    use crate::storage::test_support::create_test_storage;

    fn read_back(bytes: &[u8], delimiter: u8) -> Vec<Vec<String>> {
        assert!(bytes.starts_with(BOM));
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_reader(&bytes[BOM.len()..]);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_empty_export_is_bom_and_header() {
        let mut output = Vec::new();
        write_transactions_csv(&[], &HashMap::new(), &mut output, CsvDelimiter::Semicolon).unwrap();

        let mut expected = BOM.to_vec();
        expected.extend_from_slice(b"Date;Account;Name;Category;Direction;Amount\n");
        assert_eq!(output, expected);

        let rows = read_back(&output, b';');
        assert_eq!(rows, vec![TRANSACTION_HEADERS.map(String::from).to_vec()]);
    }

    #[test]
    fn test_rows_are_signed_and_quoted() {
        let account = Account::new("Main card", AccountKind::Card);
        let names = HashMap::from([(account.id, account.name.clone())]);
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        let txns = vec![
            Transaction::outgoing(account.id, "Coffee; large", "Cafe", Money::from_minor(35_050), date),
            Transaction::incoming(account.id, "Salary", "Salary", Money::from_units(95_000), date),
        ];

        let mut output = Vec::new();
        write_transactions_csv(&txns, &names, &mut output, CsvDelimiter::Semicolon).unwrap();
        let rows = read_back(&output, b';');

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            vec!["2026-10-03", "Main card", "Coffee; large", "Cafe", "out", "-350.50"]
        );
        assert_eq!(rows[2][4], "in");
        assert_eq!(rows[2][5], "95000.00");
    }

    #[test]
    fn test_comma_delimiter() {
        let mut output = Vec::new();
        write_transactions_csv(&[], &HashMap::new(), &mut output, CsvDelimiter::Comma).unwrap();
        assert!(output.ends_with(b"Date,Account,Name,Category,Direction,Amount\n"));
    }

    #[test]
    fn test_export_from_storage() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::with_balance("Card", AccountKind::Card, Money::from_units(100));
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        storage
            .transactions
            .upsert(Transaction::outgoing(account.id, "Shop", "Groceries", Money::from_units(10), date))
            .unwrap();
        storage.accounts.upsert(account).unwrap();

        let mut output = Vec::new();
        let count = export_transactions_csv(
            &storage,
            &TransactionFilter::new(),
            date,
            &mut output,
            CsvDelimiter::Semicolon,
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(read_back(&output, b';')[1][1], "Card");

        let mut accounts = Vec::new();
        export_accounts_csv(&storage, &mut accounts, CsvDelimiter::Comma).unwrap();
        assert_eq!(read_back(&accounts, b',')[1][2], "100.00");
    }
}
