// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{SyncError, TransportError};

/// All possible errors that can occur in the stowrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'stow init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{0}")]
    Queue(#[from] stow_core::Error),

    #[error("invalid header '{0}'\n  hint: headers are written as 'Name: value'")]
    InvalidHeader(String),

    #[error("invalid JSON body: {0}\n  hint: drop --json-body to send the body as plain text")]
    InvalidBody(String),

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("submission failed: {0}")]
    SubmitFailed(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("queue task failed: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for stowrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<SyncError> for Error {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Store(e) => Error::Queue(e),
            SyncError::Transport(e) => Error::Transport(e),
            SyncError::Task(e) => Error::Task(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
