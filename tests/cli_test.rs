use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn script(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

#[test]
fn test_card_payment_session_end_to_end() {
    let script = script(&[
        "# demo invoice 1001, card surcharge 2.9%",
        "pin 123456",
        "option full",
        "method card",
        "submit",
        "quit",
    ]);

    let mut cmd = Command::new(cargo_bin!("payportal"));
    cmd.arg("1001").arg("--script").arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("== Invoice INV-2041 =="))
        .stdout(predicate::str::contains("2500.00 + 72.50 fee = 2572.50"))
        .stdout(predicate::str::contains("== Payment confirmation =="))
        .stdout(predicate::str::contains("total:       2572.50"))
        .stdout(predicate::str::contains("CN-"));
}

#[test]
fn test_rejected_pin_shows_inline_notice() {
    let script = script(&["pin 000000", "quit"]);

    let mut cmd = Command::new(cargo_bin!("payportal"));
    cmd.arg("1001").arg("--script").arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("== PIN entry =="))
        .stdout(predicate::str::contains("does not match"))
        .stderr(predicate::str::contains("access denied"));
}

#[test]
fn test_disabled_card_is_not_offered() {
    let script = script(&["pin 222333", "option full", "method card", "quit"]);

    let mut cmd = Command::new(cargo_bin!("payportal"));
    cmd.arg("1002").arg("--script").arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("methods:    bank_debit, check"))
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn test_malformed_event_is_reported_and_skipped() {
    let script = script(&["pin 123456", "method plutonium", "quit"]);

    let mut cmd = Command::new(cargo_bin!("payportal"));
    cmd.arg("1001").arg("--script").arg(script.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading event"))
        .stdout(predicate::str::contains("== Invoice INV-2041 =="));
}

#[test]
fn test_scheduled_invoice_opens_prefilled() {
    let script = script(&["pin 654321", "quit"]);

    let mut cmd = Command::new(cargo_bin!("payportal"));
    cmd.arg("1003").arg("--script").arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("status:     scheduled"))
        .stdout(predicate::str::contains("scheduled:  Check on"))
        .stdout(predicate::str::contains("ready to submit"));
}
