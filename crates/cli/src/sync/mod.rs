// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue, delivery, and connectivity tracking.
//!
//! # Features
//!
//! - Durable SQLite queue opened lazily behind an async handle
//! - Oldest-first flush with bounded retries and dead-letter events
//! - Flush on reconnect and on a periodic background-sync tick
//! - Injectable transport trait for testing

mod flush;
mod monitor;
mod queue;
mod transport;

pub use flush::{DeadLetter, FlushReport, Flusher, QueueEvent, SubmitOutcome};
pub use monitor::{run_flush_loop, run_probe_loop, Connectivity, ConnectivityMonitor};
pub use queue::{OfflineQueue, SyncError, SyncResult};
pub use transport::{HttpTransport, OutgoingRequest, Transport, TransportError, TransportResult};

#[cfg(test)]
mod test_helpers;


#[cfg(test)]
mod transport_tests;
