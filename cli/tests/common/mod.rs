//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;

/// Create a new command for the dataeval binary.
pub fn dataeval() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dataeval"));
    cmd.arg("--no-color");
    cmd
}

/// Create a temporary file with the given content.
pub fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

pub fn path_of(file: &tempfile::NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}
