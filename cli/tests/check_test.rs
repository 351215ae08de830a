//! Integration tests for the `check` command.

mod common;

use common::{dataeval, path_of, temp_file};
use predicates::prelude::*;

#[test]
fn check_valid_file() {
    let file = temp_file("{'foo': 'bar'}\n");

    dataeval()
        .args(["check", path_of(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn check_multiple_valid_files() {
    let file1 = temp_file("1");
    let file2 = temp_file("[True, None]");
    let file3 = temp_file("{\r\n'a': 1\r\n}");

    dataeval()
        .args(["check", path_of(&file1), path_of(&file2), path_of(&file3)])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK").count(3));
}

#[test]
fn check_reports_each_failure() {
    let good = temp_file("1");
    let bad = temp_file("{'a': b}");

    dataeval()
        .args(["check", path_of(&good), path_of(&bad)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("OK").count(1))
        .stderr(predicate::str::contains("unsafe name 'b'"));
}

#[test]
fn check_quiet() {
    let bad = temp_file(":");

    dataeval()
        .args(["check", "--quiet", path_of(&bad)])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn check_stdin() {
    dataeval()
        .args(["check", "-"])
        .write_stdin("(1, 2)")
        .assert()
        .success()
        .stdout("<stdin>: OK\n");
}

#[test]
fn check_missing_file() {
    dataeval()
        .args(["check", "/nonexistent/prefs.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/prefs.txt"));
}
