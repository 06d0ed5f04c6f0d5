// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.
//!
//! Verbosity comes from `STOW_LOG` (an `EnvFilter` directive such as
//! `debug` or `stow=debug,stowrs=trace`), falling back to a per-command
//! default.

use tracing_subscriber::EnvFilter;

use crate::env;

/// Level used by one-shot commands.
pub const DEFAULT_LEVEL: &str = "warn";

/// Level used by long-running commands.
pub const WATCH_LEVEL: &str = "info";

/// Build the filter from `STOW_LOG`, or `default_level` if it is unset or
/// does not parse.
pub fn filter(default_level: &str) -> EnvFilter {
    env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

/// Install the global subscriber. Later calls are ignored.
pub fn setup_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
