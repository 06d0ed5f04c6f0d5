// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn stow() -> Command {
    let mut cmd = cargo_bin_cmd!("stow");
    cmd.env_remove("STOW_DIR").env_remove("STOW_LOG");
    cmd
}

/// Helper to create an initialized temp directory
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    stow()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Rewrite one line of `.stow/config.toml` in an initialized temp directory
pub fn set_config(temp: &TempDir, from: &str, to: &str) {
    let path = temp.path().join(".stow/config.toml");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(from), "config has no '{from}'");
    std::fs::write(&path, content.replace(from, to)).unwrap();
}

/// Queue a request and return its numeric id
pub fn enqueue(temp: &TempDir, url: &str) -> String {
    let output = stow()
        .arg("enqueue")
        .arg(url)
        .arg("-o")
        .arg("id")
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Return the parsed `list -o json` output
pub fn list_json(temp: &TempDir) -> serde_json::Value {
    let output = stow()
        .arg("list")
        .arg("-o")
        .arg("json")
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}
