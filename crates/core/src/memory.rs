// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory queue used when the durable store cannot be opened.
//!
//! Same contract as [`Database`](crate::db::Database) minus durability:
//! everything is lost when the process exits.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::request::{QueuedRequest, RequestId, RequestPatch, RequestStatus};
use crate::store::{next_retry, FailureOutcome, QueueBackend};
use crate::validate::ValidRequest;

#[derive(Debug, Default)]
pub struct MemoryQueue {
    records: BTreeMap<RequestId, QueuedRequest>,
    /// Last id handed out; never decremented.
    last_id: i64,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueBackend for MemoryQueue {
    fn insert(
        &mut self,
        request: &ValidRequest,
        timestamp_ms: i64,
        max_retries: u32,
        capacity: usize,
    ) -> Result<RequestId> {
        if self.records.len() >= capacity {
            return Err(Error::QueueFull { capacity });
        }

        self.last_id += 1;
        let id = RequestId::new(self.last_id);
        self.records.insert(
            id,
            QueuedRequest {
                id,
                url: request.url().to_string(),
                method: request.method(),
                headers: request.headers().clone(),
                body: request.body().cloned(),
                timestamp: timestamp_ms,
                retries: 0,
                max_retries,
                status: RequestStatus::Pending,
            },
        );
        Ok(id)
    }

    fn list_pending(&self) -> Result<Vec<QueuedRequest>> {
        let mut records: Vec<QueuedRequest> = self.records.values().cloned().collect();
        records.sort_by_key(|r| (r.timestamp, r.id));
        Ok(records)
    }

    fn get(&self, id: RequestId) -> Result<QueuedRequest> {
        self.records.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    fn remove(&mut self, id: RequestId) -> Result<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    fn update(&mut self, id: RequestId, patch: &RequestPatch) -> Result<QueuedRequest> {
        let record = self.records.get_mut(&id).ok_or(Error::NotFound(id))?;
        patch.apply(record)?;
        Ok(record.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn record_failure(&mut self, id: RequestId) -> Result<FailureOutcome> {
        let Some(record) = self.records.get_mut(&id) else {
            return Ok(FailureOutcome::AlreadyHandled);
        };
        if let Some(retries) = next_retry(record) {
            record.retries = retries;
            record.status = RequestStatus::Failed;
            return Ok(FailureOutcome::Retry { retries });
        }
        match self.records.remove(&id) {
            Some(mut dead) => {
                dead.status = RequestStatus::Dead;
                Ok(FailureOutcome::Dead(dead))
            }
            None => Ok(FailureOutcome::AlreadyHandled),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
