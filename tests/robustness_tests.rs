use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_invalid_receipts_are_skipped() {
    let valid = common::write_receipt("Walgreens", "2.00", 2).unwrap();

    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("process")
        .arg("tests/fixtures/malformed.json")
        .arg("tests/fixtures/empty_items.json")
        .arg(valid.path());

    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains(r#"{"id":""#));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error processing receipt tests/fixtures/malformed.json"));
    assert!(stderr.contains("at least one item"));
}

#[test]
fn test_missing_file_is_reported() {
    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("process").arg("tests/fixtures/does_not_exist.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot open"));
}

#[test]
fn test_process_errors_use_error_body() {
    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("process").arg("tests/fixtures/empty_items.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(r#"{"status":400,"error":"Validation failed: "#));
}

#[test]
fn test_score_rejects_empty_items() {
    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("score").arg("tests/fixtures/empty_items.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_boundary_totals() {
    // "Round" has 5 alphanumerics; 4 items make 2 pairs; day 2 is even
    let round = common::write_receipt("Round", "100.00", 4).unwrap();
    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("score").arg(round.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"points":90}"#));

    let odd = common::write_receipt("Round", "100.10", 4).unwrap();
    let mut cmd = Command::new(cargo_bin!("receipt-points"));
    cmd.arg("score").arg(odd.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"points":15}"#));
}
