// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The queue store: validation, capacity, and retry bookkeeping on top of a
//! storage backend.
//!
//! A [`Store`] is constructed once by the application and handed to whoever
//! needs to enqueue or flush. Construction is also where backend capability
//! is decided: [`Store::open`] insists on durability, while
//! [`Store::negotiate`] falls back to an in-memory queue and reports
//! [`Capability::Degraded`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{ClockSource, SystemClock};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::memory::MemoryQueue;
use crate::request::{NewRequest, QueuedRequest, RequestId, RequestPatch};
use crate::validate::{validate, QueueLimits, ValidRequest};

/// Storage operations a queue backend must provide.
///
/// Every method is a single atomic step against the backend; in particular
/// `insert` checks capacity and writes in one step, and `update` reads,
/// merges, and writes in one step.
pub trait QueueBackend: Send {
    /// Persist a validated request, failing with [`Error::QueueFull`] when
    /// `capacity` records are already stored.
    fn insert(
        &mut self,
        request: &ValidRequest,
        timestamp_ms: i64,
        max_retries: u32,
        capacity: usize,
    ) -> Result<RequestId>;

    /// All stored records, oldest timestamp first.
    fn list_pending(&self) -> Result<Vec<QueuedRequest>>;

    fn get(&self, id: RequestId) -> Result<QueuedRequest>;

    /// Delete a record. Returns false if it did not exist.
    fn remove(&mut self, id: RequestId) -> Result<bool>;

    fn update(&mut self, id: RequestId, patch: &RequestPatch) -> Result<QueuedRequest>;

    fn clear(&mut self) -> Result<()>;

    fn count(&self) -> Result<usize>;

    /// Apply the retry policy after a failed delivery of `id`, reading and
    /// writing the record in one step.
    fn record_failure(&mut self, id: RequestId) -> Result<FailureOutcome>;
}

/// Retry count after one more failed delivery, or `None` once the record has
/// used up `max_retries`.
pub(crate) fn next_retry(record: &QueuedRequest) -> Option<u32> {
    let next = record.retries.saturating_add(1);
    (next <= record.max_retries).then_some(next)
}

/// Whether queued requests survive a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Durable,
    /// Running on the in-memory backend because the durable one failed.
    Degraded { reason: String },
}

impl Capability {
    pub fn is_durable(&self) -> bool {
        matches!(self, Capability::Durable)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Durable => write!(f, "durable"),
            Capability::Degraded { reason } => write!(f, "degraded ({reason})"),
        }
    }
}

/// Result of recording one failed delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// The record stays queued with the new retry count.
    Retry { retries: u32 },
    /// Retries were exhausted; the record was removed. Carries the final
    /// state with status `dead`.
    Dead(QueuedRequest),
    /// The record was already gone, e.g. removed by a concurrent flush.
    AlreadyHandled,
}

/// Validated, capacity-bounded queue over a [`QueueBackend`].
pub struct Store {
    backend: Box<dyn QueueBackend>,
    limits: QueueLimits,
    clock: Arc<dyn ClockSource>,
    capability: Capability,
}

impl Store {
    /// Open the durable SQLite store at `path`.
    ///
    /// Any failure to open or migrate the database is reported as
    /// [`Error::StoreUnavailable`].
    pub fn open(path: &Path, limits: QueueLimits) -> Result<Self> {
        let db = Database::open(path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::with_backend(Box::new(db), limits, Capability::Durable))
    }

    /// Open the durable store, or fall back to an in-memory queue.
    pub fn negotiate(path: &Path, limits: QueueLimits) -> Self {
        match Self::open(path, limits) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "durable queue unavailable, queued requests will not survive restart");
                Self::degraded(limits, e.to_string())
            }
        }
    }

    /// An in-memory SQLite store with durable semantics (for testing).
    pub fn open_in_memory(limits: QueueLimits) -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::with_backend(Box::new(db), limits, Capability::Durable))
    }

    /// A non-durable store backed by [`MemoryQueue`].
    pub fn degraded(limits: QueueLimits, reason: impl Into<String>) -> Self {
        Self::with_backend(
            Box::new(MemoryQueue::new()),
            limits,
            Capability::Degraded {
                reason: reason.into(),
            },
        )
    }

    pub fn with_backend(
        backend: Box<dyn QueueBackend>,
        limits: QueueLimits,
        capability: Capability,
    ) -> Self {
        Store {
            backend,
            limits,
            clock: Arc::new(SystemClock),
            capability,
        }
    }

    /// Replace the clock used to stamp new records.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn limits(&self) -> &QueueLimits {
        &self.limits
    }

    /// Validate and persist a candidate, returning its new id.
    pub fn enqueue(&mut self, candidate: &NewRequest) -> Result<RequestId> {
        let valid = validate(candidate, &self.limits)?;
        let id = self.backend.insert(
            &valid,
            self.clock.now_ms(),
            self.limits.max_retries,
            self.limits.max_pending,
        )?;
        debug!(%id, method = %valid.method(), url = valid.url(), "queued request");
        Ok(id)
    }

    /// Decode, validate, and persist an untyped candidate.
    pub fn enqueue_json(&mut self, value: &Value) -> Result<RequestId> {
        let candidate = NewRequest::from_json(value, &self.limits)?;
        self.enqueue(&candidate)
    }

    pub fn list_pending(&self) -> Result<Vec<QueuedRequest>> {
        self.backend.list_pending()
    }

    pub fn get(&self, id: RequestId) -> Result<QueuedRequest> {
        self.backend.get(id)
    }

    /// Remove a record. Removing an id that no longer exists is not an
    /// error; the return value tells the caller whether anything was deleted.
    pub fn remove(&mut self, id: RequestId) -> Result<bool> {
        self.backend.remove(id)
    }

    pub fn update(&mut self, id: RequestId, patch: &RequestPatch) -> Result<QueuedRequest> {
        self.backend.update(id, patch)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.backend.clear()
    }

    pub fn count(&self) -> Result<usize> {
        self.backend.count()
    }

    /// Apply the retry policy after a failed delivery of `id`.
    ///
    /// `retries + 1 <= max_retries` keeps the record with the incremented
    /// count and status `failed`; anything past the cap removes it.
    pub fn record_failure(&mut self, id: RequestId) -> Result<FailureOutcome> {
        self.backend.record_failure(id)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
