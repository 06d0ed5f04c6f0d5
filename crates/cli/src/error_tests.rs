// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use stow_core::RequestId;

#[test]
fn test_error_not_initialized_display() {
    let err = Error::NotInitialized;
    assert!(err.to_string().contains("not initialized"));
    assert!(err.to_string().contains("stow init"));
}

#[test]
fn test_error_already_initialized_display() {
    let err = Error::AlreadyInitialized("/path/to/.stow".to_string());
    assert!(err.to_string().contains("already initialized"));
    assert!(err.to_string().contains("/path/to/.stow"));
}

#[test]
fn test_error_invalid_header_has_hint() {
    let err = Error::InvalidHeader("nocolon".to_string());
    let msg = err.to_string();
    assert!(msg.contains("nocolon"));
    assert!(msg.contains("hint: headers are written as 'Name: value'"));
}

#[test]
fn test_core_errors_display_unchanged() {
    let core = stow_core::Error::NotFound(RequestId::new(7));
    let expected = core.to_string();
    let err: Error = core.into();
    assert_eq!(err.to_string(), expected);
}

#[test]
fn test_sync_store_error_maps_to_queue() {
    let sync = SyncError::Store(stow_core::Error::QueueFull { capacity: 100 });
    let err: Error = sync.into();
    assert!(matches!(
        err,
        Error::Queue(stow_core::Error::QueueFull { capacity: 100 })
    ));
}

#[test]
fn test_sync_transport_error_maps_to_transport() {
    let err: Error = SyncError::Transport(TransportError::Status(502)).into();
    assert!(matches!(err, Error::Transport(TransportError::Status(502))));
    assert!(err.to_string().contains("502"));
}

#[test]
fn test_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(err.to_string().contains("io error"));
}
