use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_extract_from_argument() {
    cargo_bin_cmd!("otp")
        .args(["sms", "extract", "<#> Your code is 482913 FA+9qCX9VSu"])
        .assert()
        .success()
        .stdout("482913\n");
}

#[test]
fn test_extract_from_stdin_with_digits() {
    cargo_bin_cmd!("otp")
        .args(["sms", "extract", "--digits", "4"])
        .write_stdin("Use 7731 to sign in\n")
        .assert()
        .success()
        .stdout("7731\n");
}

#[test]
fn test_extract_without_code_fails() {
    cargo_bin_cmd!("otp")
        .args(["sms", "extract", "no digits here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No 6-digit code found"));
}

#[test]
fn test_extract_reports_timeout_payload() {
    cargo_bin_cmd!("otp")
        .args(["sms", "extract", "Timeout Error."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timed out"));
}
