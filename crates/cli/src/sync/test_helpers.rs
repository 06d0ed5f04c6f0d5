// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stow_core::{ManualClock, QueueLimits, Store};

use super::monitor::{Connectivity, ConnectivityMonitor};
use super::queue::OfflineQueue;
use super::transport::{OutgoingRequest, Transport, TransportError, TransportResult};
use super::Flusher;

#[derive(Default)]
struct MockState {
    /// URLs of successful deliveries, in order.
    sent: Mutex<Vec<String>>,
    /// URLs that answer 503.
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    delay_ms: AtomicU64,
    attempts: AtomicUsize,
    probes: AtomicUsize,
}

/// Mock transport for testing without real sockets.
///
/// Clones share state, so a test can keep a handle after giving one to a
/// flusher.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to `url` fail with a 503.
    pub fn fail_url(&self, url: &str) {
        self.state.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn heal_url(&self, url: &str) {
        self.state.failing.lock().unwrap().remove(url);
    }

    /// Make every delivery and probe fail to connect.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold each delivery for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.state
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.state.attempts.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.state.probes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn deliver<'a>(
        &'a self,
        request: OutgoingRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + 'a>> {
        let state = Arc::clone(&self.state);
        let url = request.url.to_string();
        Box::pin(async move {
            state.attempts.fetch_add(1, Ordering::SeqCst);
            let delay = state.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if state.offline.load(Ordering::SeqCst) {
                return Err(TransportError::ConnectionFailed("mock offline".into()));
            }
            if state.failing.lock().unwrap().contains(&url) {
                return Err(TransportError::Status(503));
            }
            state.sent.lock().unwrap().push(url);
            Ok(200)
        })
    }

    fn probe<'a>(
        &'a self,
        _url: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + 'a>> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            state.probes.fetch_add(1, Ordering::SeqCst);
            if state.offline.load(Ordering::SeqCst) {
                Err(TransportError::ConnectionFailed("mock offline".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// A durable in-memory queue stamped by `clock`.
pub fn memory_queue_with_clock(clock: Arc<ManualClock>) -> Arc<OfflineQueue> {
    let store = Store::open_in_memory(QueueLimits::default())
        .unwrap()
        .with_clock(clock);
    Arc::new(OfflineQueue::from_store(store))
}

/// A durable in-memory queue whose clock stands still.
pub fn memory_queue() -> Arc<OfflineQueue> {
    memory_queue_with_clock(Arc::new(ManualClock::new(1_000)))
}

pub fn flusher(
    queue: &Arc<OfflineQueue>,
    transport: &MockTransport,
    connectivity: Connectivity,
) -> Flusher {
    Flusher::new(
        Arc::clone(queue),
        Arc::new(transport.clone()),
        ConnectivityMonitor::new(connectivity),
    )
}
