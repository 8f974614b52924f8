use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("streakvault"));
    cmd.arg("tests/fixtures/replay.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,user,deposit,fee,target_days,checked_in_days,start_date",
        ))
        // Commitment 0: two on-time check-ins on a two-day target.
        .stdout(predicate::str::contains("0,20,0.975"))
        .stdout(predicate::str::contains("completed,Morning run,true"))
        // Commitment 1: abandoned, settled by the loss account's claim.
        .stdout(predicate::str::contains("1,21,1.95"))
        .stdout(predicate::str::contains("failed,Evening read,true"));

    Ok(())
}

#[test]
fn test_cli_reports_rejected_operations() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, at, caller, id, days, account, start, title, amount").unwrap();
    writeln!(file, "register, 0, 0, , , 10, , , ").unwrap();
    writeln!(file, "fund, , 20, , , , , , 5.0").unwrap();
    // Unregistered loss account: rejected, no commitment appended.
    writeln!(file, "create, 1000, 20, , 7, 99, 86400, Stretching, 1.0").unwrap();
    writeln!(file, "create, 1000, 20, , 7, 10, 86400, Stretching, 1.0").unwrap();
    // Repeat check-in within day 0.
    writeln!(file, "checkin, 90000, 20, 0, , , , , ").unwrap();
    writeln!(file, "checkin, 91000, 20, 0, , , , , ").unwrap();

    let mut cmd = Command::new(cargo_bin!("streakvault"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("not a registered loss account"))
        .stderr(predicate::str::contains("already checked in today"))
        .stdout(predicate::str::contains("0,20,0.975"));
}

#[test]
fn test_cli_malformed_rows_are_skipped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, at, caller, id, days, account, start, title, amount").unwrap();
    writeln!(file, "explode, 0, 1, , , , , , ").unwrap();
    writeln!(file, "fund, , 20, , , , , , 5.0").unwrap();

    let mut cmd = Command::new(cargo_bin!("streakvault"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"));
}
