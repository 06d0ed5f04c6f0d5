// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking and the background loops driven by it.
//!
//! The monitor is the only place that knows whether the network is up.
//! The store never consults it; the flush loop subscribes to it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::flush::Flusher;
use super::transport::Transport;

/// Observed network state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Publishes connectivity changes to any number of subscribers.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<Connectivity>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        ConnectivityMonitor { tx: Arc::new(tx) }
    }

    /// Publish a state. Returns true if it differs from the previous one.
    pub fn report(&self, state: Connectivity) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            info!(state = %state, "connectivity changed");
        }
        changed
    }

    pub fn current(&self) -> Connectivity {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.current() == Connectivity::Online
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}

/// Probe `url` every `interval` and feed the result to `monitor`.
pub async fn run_probe_loop(
    monitor: ConnectivityMonitor,
    transport: Arc<dyn Transport>,
    url: String,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        let state = match transport.probe(&url).await {
            Ok(()) => Connectivity::Online,
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed");
                Connectivity::Offline
            }
        };
        monitor.report(state);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Flush on every offline-to-online transition and on each `sync_interval`
/// tick while online. The first tick fires immediately.
pub async fn run_flush_loop(
    flusher: Arc<Flusher>,
    monitor: ConnectivityMonitor,
    sync_interval: Duration,
    cancel: CancellationToken,
) {
    let mut rx = monitor.subscribe();
    let mut last = *rx.borrow_and_update();
    let mut ticker = tokio::time::interval(sync_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = *rx.borrow_and_update();
                if last == Connectivity::Offline && now == Connectivity::Online {
                    flush_logged(&flusher, "reconnect").await;
                }
                last = now;
            }
            _ = ticker.tick() => {
                if last == Connectivity::Online {
                    flush_logged(&flusher, "interval").await;
                }
            }
        }
    }
}

async fn flush_logged(flusher: &Flusher, trigger: &str) {
    debug!(trigger, "flushing queue");
    if let Err(e) = flusher.flush().await {
        warn!(trigger, error = %e, "flush failed");
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
