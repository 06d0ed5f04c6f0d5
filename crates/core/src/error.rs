// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for stow-core operations.

use thiserror::Error;

use crate::request::RequestId;

/// All possible errors that can occur in stow-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("queue is full ({capacity} pending requests)\n  hint: flush the queue or wait for pending requests to drain")]
    QueueFull { capacity: usize },

    #[error("durable store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("queued request not found: {0}")]
    NotFound(RequestId),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Shorthand for a validation failure with a human-readable reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation(reason.into())
    }

    /// Returns true if the error means the durable backend cannot be used.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

/// A specialized Result type for stow-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
