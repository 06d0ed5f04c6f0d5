// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod enqueue;
pub mod flush;
pub mod init;
pub mod list;
pub mod remove;
pub mod submit;
pub mod update;
pub mod watch;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{find_stow_dir, get_queue_path, Config};
use crate::error::{Error, Result};
use crate::sync::{Connectivity, ConnectivityMonitor, HttpTransport, OfflineQueue, Transport};

/// Helper to build the queue handle from the current context.
///
/// The store itself is opened on first use.
pub fn open_queue() -> Result<(Arc<OfflineQueue>, Config, PathBuf)> {
    let stow_dir = find_stow_dir()?;
    let config = Config::load(&stow_dir)?;
    let queue = OfflineQueue::new(get_queue_path(&stow_dir, &config), config.queue.limits());
    Ok((Arc::new(queue), config, stow_dir))
}

/// Build the HTTP transport from config.
pub fn http_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(HttpTransport::new(config.transport.timeout())?))
}

/// Probe once to seed the monitor. Without a probe URL the network is
/// assumed up.
pub async fn initial_connectivity(
    config: &Config,
    transport: &dyn Transport,
) -> ConnectivityMonitor {
    let state = match &config.monitor.probe_url {
        Some(url) => match transport.probe(url).await {
            Ok(()) => Connectivity::Online,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "initial probe failed");
                Connectivity::Offline
            }
        },
        None => Connectivity::Online,
    };
    ConnectivityMonitor::new(state)
}

/// Run an async command body to completion.
pub fn block_on<F: Future<Output = Result<T>>, T>(future: F) -> Result<T> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    rt.block_on(future)
}
