// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flush routine: delivers queued requests and applies the retry policy.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Flusher   │────►│  Transport  │────►│   Remote    │
//! │             │◄────│   (trait)   │◄────│   Server    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │OfflineQueue │  (durable pending requests)
//! └─────────────┘
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use stow_core::{validate, FailureOutcome, NewRequest, QueuedRequest, RequestId};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::monitor::ConnectivityMonitor;
use super::queue::{OfflineQueue, SyncError, SyncResult};
use super::transport::{OutgoingRequest, Transport};

const EVENT_CAPACITY: usize = 64;

/// A request dropped after exhausting its retries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadLetter {
    /// Final state of the record, with status `dead`.
    pub request: QueuedRequest,
    /// Error from the last delivery attempt.
    pub error: String,
}

/// Events broadcast by the flusher.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    Delivered { id: RequestId, status: u16 },
    RetryScheduled { id: RequestId, retries: u32, error: String },
    DeadLettered(DeadLetter),
}

/// Outcome of one flush pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlushReport {
    pub delivered: usize,
    pub retried: usize,
    pub dead_lettered: usize,
    /// Records another flush was already delivering, or that vanished mid-pass.
    pub skipped: usize,
    /// Every request this pass dropped, in delivery order.
    pub dead_letters: Vec<DeadLetter>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.delivered + self.retried + self.dead_lettered + self.skipped == 0
    }
}

/// Result of a direct submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered right away; nothing was queued.
    Delivered { status: u16 },
    /// Stored for a later flush.
    Queued(RequestId),
    /// Neither delivery nor queueing worked.
    Failed { reason: String },
}

/// Delivers queued requests through a [`Transport`].
pub struct Flusher {
    queue: Arc<OfflineQueue>,
    transport: Arc<dyn Transport>,
    monitor: ConnectivityMonitor,
    /// Ids currently being delivered by some flush in this process.
    in_flight: Arc<Mutex<HashSet<RequestId>>>,
    events: broadcast::Sender<QueueEvent>,
}

/// Releases an in-flight claim when dropped.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<RequestId>>>,
    id: RequestId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl Flusher {
    pub fn new(
        queue: Arc<OfflineQueue>,
        transport: Arc<dyn Transport>,
        monitor: ConnectivityMonitor,
    ) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Flusher {
            queue,
            transport,
            monitor,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            events,
        }
    }

    pub fn queue(&self) -> &Arc<OfflineQueue> {
        &self.queue
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    /// Receive delivery, retry, and dead-letter events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    fn claim(&self, id: RequestId) -> Option<InFlightGuard> {
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(id) {
            return None;
        }
        Some(InFlightGuard {
            set: Arc::clone(&self.in_flight),
            id,
        })
    }

    fn emit(&self, event: QueueEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Attempt delivery of every pending record, oldest first.
    pub async fn flush(&self) -> SyncResult<FlushReport> {
        let pending = self.queue.list_pending().await?;
        let mut report = FlushReport::default();

        for record in pending {
            let Some(_claim) = self.claim(record.id) else {
                debug!(id = %record.id, "already in flight, skipping");
                report.skipped += 1;
                continue;
            };
            // Another flush may have finished this record after we listed it
            let record = match self.queue.get(record.id).await {
                Ok(current) => current,
                Err(SyncError::Store(stow_core::Error::NotFound(_))) => {
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.transport.deliver(OutgoingRequest::from(&record)).await {
                Ok(status) => {
                    self.queue.remove(record.id).await?;
                    debug!(id = %record.id, status, "delivered");
                    report.delivered += 1;
                    self.emit(QueueEvent::Delivered {
                        id: record.id,
                        status,
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    match self.queue.record_failure(record.id).await? {
                        FailureOutcome::Retry { retries } => {
                            debug!(id = %record.id, retries, error = %error, "delivery failed, will retry");
                            report.retried += 1;
                            self.emit(QueueEvent::RetryScheduled {
                                id: record.id,
                                retries,
                                error,
                            });
                        }
                        FailureOutcome::Dead(request) => {
                            warn!(
                                id = %request.id,
                                method = %request.method,
                                url = %request.url,
                                retries = request.retries,
                                error = %error,
                                "dropping request after exhausting retries"
                            );
                            let dead = DeadLetter { request, error };
                            report.dead_lettered += 1;
                            report.dead_letters.push(dead.clone());
                            self.emit(QueueEvent::DeadLettered(dead));
                        }
                        FailureOutcome::AlreadyHandled => {
                            report.skipped += 1;
                        }
                    }
                }
            }
        }

        if !report.is_empty() {
            info!(
                delivered = report.delivered,
                retried = report.retried,
                dead_lettered = report.dead_lettered,
                skipped = report.skipped,
                "flush complete"
            );
        }
        Ok(report)
    }

    /// Deliver a candidate now if possible, otherwise queue it.
    ///
    /// Validation and capacity errors are returned as errors. When the
    /// durable store is unavailable the request is attempted directly and
    /// nothing is kept on failure.
    pub async fn submit(&self, candidate: NewRequest) -> SyncResult<SubmitOutcome> {
        let valid = validate(&candidate, self.queue.limits())?;

        let durable = match self.queue.capability().await {
            Ok(capability) => capability.is_durable(),
            Err(e) if is_unavailable(&e) => {
                warn!(error = %e, "queue unavailable, delivering without durability");
                return Ok(match self.transport.deliver(OutgoingRequest::from(&valid)).await {
                    Ok(status) => SubmitOutcome::Delivered { status },
                    Err(e) => SubmitOutcome::Failed {
                        reason: e.to_string(),
                    },
                });
            }
            Err(e) => return Err(e),
        };

        if self.monitor.is_online() || !durable {
            match self.transport.deliver(OutgoingRequest::from(&valid)).await {
                Ok(status) => return Ok(SubmitOutcome::Delivered { status }),
                Err(e) => debug!(error = %e, "direct delivery failed, queueing"),
            }
        }

        let id = self.queue.enqueue(candidate).await?;
        Ok(SubmitOutcome::Queued(id))
    }
}

fn is_unavailable(err: &SyncError) -> bool {
    matches!(err, SyncError::Store(e) if e.is_store_unavailable())
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
