// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::STOW_DIR, "STOW_DIR");
    assert_eq!(vars::STOW_LOG, "STOW_LOG");
}

// Both variables are exercised in one test so parallel tests never race on
// the process environment.
#[test]
fn test_accessors() {
    std::env::remove_var("STOW_DIR");
    assert!(stow_dir().is_none());
    std::env::set_var("STOW_DIR", "");
    assert!(stow_dir().is_none());
    std::env::set_var("STOW_DIR", "/tmp/project/.stow");
    assert_eq!(stow_dir(), Some(PathBuf::from("/tmp/project/.stow")));
    std::env::remove_var("STOW_DIR");

    std::env::remove_var("STOW_LOG");
    assert!(log_filter().is_none());
    std::env::set_var("STOW_LOG", "debug");
    assert_eq!(log_filter().as_deref(), Some("debug"));
    std::env::remove_var("STOW_LOG");
}
