// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! stow-core: Durable pending-request queue.
//!
//! This crate provides the request model, input validation, and the
//! [`Store`] that persists deferred network requests until a flush delivers
//! them or they run out of retries. It does no networking of its own.

pub mod clock;
pub mod db;
pub mod error;
pub mod memory;
pub mod request;
pub mod store;
pub mod validate;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use memory::MemoryQueue;
pub use request::{Method, NewRequest, QueuedRequest, RequestId, RequestPatch, RequestStatus};
pub use store::{Capability, FailureOutcome, QueueBackend, Store};
pub use validate::{validate, QueueLimits, ValidRequest};
