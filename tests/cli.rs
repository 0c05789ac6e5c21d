use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn minibank(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("minibank").unwrap();
    cmd.env("MINIBANK_DATA_DIR", dir.path())
        .env_remove("MINIBANK_PIN")
        .env_remove("RUST_LOG");
    cmd
}

fn init_empty_with_wallet(dir: &TempDir) {
    minibank(dir).args(["init", "--empty"]).assert().success();
    minibank(dir)
        .args(["account", "create", "Wallet", "--balance", "1000"])
        .assert()
        .success();
}

#[test]
fn loan_without_interest_divides_evenly() {
    let dir = TempDir::new().unwrap();
    minibank(&dir)
        .args(["loan", "--principal", "100000", "--rate", "0", "--months", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly payment:  10000.00"));
}

#[test]
fn loan_rejects_zero_term() {
    let dir = TempDir::new().unwrap();
    minibank(&dir)
        .args(["loan", "--principal", "1000", "--rate", "5", "--months", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one month"));
}

#[test]
fn init_seeds_demo_accounts() {
    let dir = TempDir::new().unwrap();
    minibank(&dir).arg("init").assert().success();

    minibank(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Main card"))
        .stdout(predicate::str::contains("•• 4417"))
        .stdout(predicate::str::contains("Net worth"));

    // a second init leaves existing data alone
    minibank(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo data was not added"));
}

#[test]
fn empty_csv_export_is_bom_and_header() {
    let dir = TempDir::new().unwrap();
    minibank(&dir).args(["init", "--empty"]).assert().success();

    let output = minibank(&dir).args(["export", "csv"]).output().unwrap();
    assert!(output.status.success());

    let mut expected = b"\xEF\xBB\xBF".to_vec();
    expected.extend_from_slice(b"Date;Account;Name;Category;Direction;Amount\n");
    assert_eq!(output.stdout, expected);
}

#[test]
fn transfer_with_insufficient_funds_changes_nothing() {
    let dir = TempDir::new().unwrap();
    init_empty_with_wallet(&dir);
    minibank(&dir)
        .args(["account", "create", "Savings", "--type", "savings"])
        .assert()
        .success();

    minibank(&dir)
        .args(["transfer", "Wallet", "Savings", "5000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));

    minibank(&dir)
        .args(["account", "show", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00"));
}

#[test]
fn transfer_moves_money_and_records_both_legs() {
    let dir = TempDir::new().unwrap();
    init_empty_with_wallet(&dir);
    minibank(&dir)
        .args(["account", "create", "Savings", "--type", "savings"])
        .assert()
        .success();

    minibank(&dir)
        .args(["transfer", "Wallet", "Savings", "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings balance: 250.00"));

    minibank(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transfer to Savings"))
        .stdout(predicate::str::contains("Transfer from Wallet"));
}

#[test]
fn payment_over_limit_threshold_raises_alert() {
    let dir = TempDir::new().unwrap();
    init_empty_with_wallet(&dir);
    minibank(&dir)
        .args(["limit", "add", "Cafe", "100"])
        .assert()
        .success();

    minibank(&dir)
        .args(["pay", "Wallet", "90", "--name", "Coffee", "--category", "Cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[WARNING]"))
        .stdout(predicate::str::contains("90% of the monthly limit used"));

    minibank(&dir)
        .args(["limit", "dismiss", "Cafe"])
        .assert()
        .success();
    minibank(&dir)
        .args(["limit", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active spending alerts"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    minibank(&dir)
        .args(["config", "set", "theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));

    minibank(&dir)
        .args(["config", "set", "csv-delimiter", "comma"])
        .assert()
        .success();
    let output = minibank(&dir).args(["export", "csv"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("Date,Account,Name"));
}

#[test]
fn deposit_calc_previews_interest() {
    let dir = TempDir::new().unwrap();
    minibank(&dir)
        .args(["deposit", "calc", "500000", "--rate", "15", "--months", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interest:     37500.00"));
}

#[test]
fn oversized_amounts_are_rejected_without_touching_balances() {
    let dir = TempDir::new().unwrap();
    init_empty_with_wallet(&dir);

    minibank(&dir)
        .args(["topup", "Wallet", "184467440737095517"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));

    minibank(&dir)
        .args(["topup", "Wallet", "92233720368547758"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    minibank(&dir)
        .args(["account", "show", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00"));
}
