// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! stowrs - A durable queue for HTTP requests made while offline.
//!
//! This crate provides the functionality behind the `stow` CLI: an async
//! handle over the SQLite queue from `stow-core`, an HTTP transport, the
//! flush routine that delivers queued requests, and a connectivity monitor
//! that triggers flushes when the network comes back.
//!
//! # Main Components
//!
//! - [`OfflineQueue`] - Lazily opened, shareable handle over the durable store
//! - [`Flusher`] - Oldest-first delivery with bounded retries
//! - [`ConnectivityMonitor`] - Online/offline state and the loops it drives
//! - [`Config`] - Project configuration (`.stow/config.toml`)
//! - [`Error`] - Error types for all operations
//!
//! # Wiring
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stowrs::{Config, ConnectivityMonitor, Connectivity, Flusher, HttpTransport, OfflineQueue};
//!
//! let queue = Arc::new(OfflineQueue::new(".stow/queue.db", config.queue.limits()));
//! queue.initialize().await?;
//! let transport = Arc::new(HttpTransport::new(config.transport.timeout())?);
//! let flusher = Flusher::new(queue, transport, ConnectivityMonitor::new(Connectivity::Online));
//! let report = flusher.flush().await?;
//! ```

mod cli;
mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod sync;

pub use cli::{Cli, Command, ListFormat, OutputFormat, RequestArgs};
pub use config::{find_stow_dir, get_queue_path, init_stow_dir, Config};
pub use error::{Error, Result};
pub use sync::{
    Connectivity, ConnectivityMonitor, Flusher, HttpTransport, OfflineQueue, QueueEvent,
    SubmitOutcome, Transport,
};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { endpoint, path } => commands::init::run(endpoint, path),
        Command::Enqueue { request, output } => commands::enqueue::run(&request, output),
        Command::Submit { request, output } => commands::submit::run(&request, output),
        Command::List { output } => commands::list::run(output),
        Command::Remove { ids } => commands::remove::run(&ids),
        Command::Update {
            id,
            retries,
            status,
        } => commands::update::run(&id, retries, status),
        Command::Clear => commands::clear::run(),
        Command::Flush { output } => commands::flush::run(output),
        Command::Watch => commands::watch::run(),
    }
}
