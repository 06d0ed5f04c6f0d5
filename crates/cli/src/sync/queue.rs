// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Async handle over the durable request queue.
//!
//! The store is opened lazily on first use and exactly once per handle.
//! SQLite work runs on the blocking thread pool so callers suspend instead
//! of stalling the runtime.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use stow_core::{
    Capability, ClockSource, FailureOutcome, NewRequest, QueueLimits, QueuedRequest, RequestId,
    RequestPatch, Store,
};
use tokio::sync::OnceCell;

use super::transport::TransportError;

/// Error type for queue and flush operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Error from the underlying store.
    #[error(transparent)]
    Store(#[from] stow_core::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A blocking store task panicked or was cancelled.
    #[error("queue task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for queue and flush operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Shared, lazily opened queue.
///
/// Build one per process and share it behind an `Arc`.
pub struct OfflineQueue {
    /// Path to the SQLite file.
    path: PathBuf,
    limits: QueueLimits,
    clock: Option<Arc<dyn ClockSource>>,
    store: OnceCell<Arc<Mutex<Store>>>,
}

impl OfflineQueue {
    /// Create a handle for the queue at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>, limits: QueueLimits) -> Self {
        OfflineQueue {
            path: path.into(),
            limits,
            clock: None,
            store: OnceCell::new(),
        }
    }

    /// Wrap an already opened store (for testing).
    pub fn from_store(store: Store) -> Self {
        let limits = *store.limits();
        OfflineQueue {
            path: PathBuf::from(":memory:"),
            limits,
            clock: None,
            store: OnceCell::new_with(Some(Arc::new(Mutex::new(store)))),
        }
    }

    /// Stamp new records with `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limits(&self) -> &QueueLimits {
        &self.limits
    }

    /// Open the durable store if it is not open yet.
    ///
    /// Concurrent callers share one open attempt. A failed attempt leaves the
    /// handle uninitialized so a later call retries.
    pub async fn initialize(&self) -> SyncResult<()> {
        self.store().await.map(|_| ())
    }

    /// Like [`initialize`](Self::initialize), but falls back to an in-memory
    /// queue when the durable store cannot be opened.
    pub async fn initialize_or_degrade(&self) -> SyncResult<Capability> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let limits = self.limits;
                let clock = self.clock.clone();
                let store = tokio::task::spawn_blocking(move || {
                    apply_clock(Store::negotiate(&path, limits), clock)
                })
                .await?;
                Ok::<_, SyncError>(Arc::new(Mutex::new(store)))
            })
            .await?;
        let store = Arc::clone(store);
        run_locked(store, |s| Ok(s.capability().clone())).await
    }

    pub async fn capability(&self) -> SyncResult<Capability> {
        self.with_store(|s| Ok(s.capability().clone())).await
    }

    pub async fn enqueue(&self, candidate: NewRequest) -> SyncResult<RequestId> {
        self.with_store(move |s| s.enqueue(&candidate)).await
    }

    pub async fn enqueue_json(&self, value: Value) -> SyncResult<RequestId> {
        self.with_store(move |s| s.enqueue_json(&value)).await
    }

    pub async fn list_pending(&self) -> SyncResult<Vec<QueuedRequest>> {
        self.with_store(|s| s.list_pending()).await
    }

    pub async fn get(&self, id: RequestId) -> SyncResult<QueuedRequest> {
        self.with_store(move |s| s.get(id)).await
    }

    /// Remove a record. Returns false if it was already gone.
    pub async fn remove(&self, id: RequestId) -> SyncResult<bool> {
        self.with_store(move |s| s.remove(id)).await
    }

    pub async fn update(&self, id: RequestId, patch: RequestPatch) -> SyncResult<QueuedRequest> {
        self.with_store(move |s| s.update(id, &patch)).await
    }

    pub async fn clear(&self) -> SyncResult<()> {
        self.with_store(|s| s.clear()).await
    }

    pub async fn count(&self) -> SyncResult<usize> {
        self.with_store(|s| s.count()).await
    }

    pub async fn record_failure(&self, id: RequestId) -> SyncResult<FailureOutcome> {
        self.with_store(move |s| s.record_failure(id)).await
    }

    async fn store(&self) -> SyncResult<Arc<Mutex<Store>>> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let limits = self.limits;
                let clock = self.clock.clone();
                let store = tokio::task::spawn_blocking(move || {
                    Store::open(&path, limits).map(|store| apply_clock(store, clock))
                })
                .await??;
                Ok::<_, SyncError>(Arc::new(Mutex::new(store)))
            })
            .await?;
        Ok(Arc::clone(store))
    }

    async fn with_store<T, F>(&self, f: F) -> SyncResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Store) -> stow_core::Result<T> + Send + 'static,
    {
        let store = self.store().await?;
        run_locked(store, f).await
    }
}

fn apply_clock(store: Store, clock: Option<Arc<dyn ClockSource>>) -> Store {
    match clock {
        Some(clock) => store.with_clock(clock),
        None => store,
    }
}

/// Run `f` against the store on the blocking pool.
async fn run_locked<T, F>(store: Arc<Mutex<Store>>, f: F) -> SyncResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Store) -> stow_core::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        // SQLite rolls back an unfinished transaction, so a poisoned store is usable
        let mut guard = store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    })
    .await?;
    Ok(result?)
}
