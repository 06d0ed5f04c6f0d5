// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use crate::request::NewRequest;
use crate::validate::{validate, QueueLimits};

fn valid(url: &str) -> ValidRequest {
    validate(&NewRequest::new(url), &QueueLimits::default()).unwrap()
}

#[test]
fn insert_assigns_increasing_ids() {
    let mut queue = MemoryQueue::new();
    let a = queue.insert(&valid("https://a.example"), 1, 5, 10).unwrap();
    let b = queue.insert(&valid("https://b.example"), 2, 5, 10).unwrap();
    assert!(b > a);
}

#[test]
fn insert_enforces_capacity() {
    let mut queue = MemoryQueue::new();
    queue.insert(&valid("https://a.example"), 1, 5, 1).unwrap();
    let err = queue.insert(&valid("https://b.example"), 2, 5, 1).unwrap_err();
    assert!(matches!(err, Error::QueueFull { capacity: 1 }));
    assert_eq!(queue.count().unwrap(), 1);
}

#[test]
fn list_is_oldest_first() {
    let mut queue = MemoryQueue::new();
    let late = queue.insert(&valid("https://a.example"), 20, 5, 10).unwrap();
    let early = queue.insert(&valid("https://b.example"), 10, 5, 10).unwrap();

    let ids: Vec<_> = queue.list_pending().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![early, late]);
}

#[test]
fn remove_is_idempotent() {
    let mut queue = MemoryQueue::new();
    let id = queue.insert(&valid("https://a.example"), 1, 5, 10).unwrap();
    assert!(queue.remove(id).unwrap());
    assert!(!queue.remove(id).unwrap());
}

#[test]
fn update_applies_patch() {
    let mut queue = MemoryQueue::new();
    let id = queue.insert(&valid("https://a.example"), 1, 5, 10).unwrap();
    let updated = queue
        .update(id, &RequestPatch::retries(3).with_status(RequestStatus::Failed))
        .unwrap();
    assert_eq!(updated.retries, 3);
    assert_eq!(queue.get(id).unwrap().status, RequestStatus::Failed);
}

#[test]
fn clear_keeps_id_sequence() {
    let mut queue = MemoryQueue::new();
    let first = queue.insert(&valid("https://a.example"), 1, 5, 10).unwrap();
    queue.clear().unwrap();
    let second = queue.insert(&valid("https://a.example"), 2, 5, 10).unwrap();
    assert!(second > first);
    assert_eq!(queue.count().unwrap(), 1);
}

#[test]
fn record_failure_retries_until_dead() {
    let mut queue = MemoryQueue::new();
    let id = queue.insert(&valid("https://down.example"), 1, 2, 10).unwrap();

    assert_eq!(
        queue.record_failure(id).unwrap(),
        FailureOutcome::Retry { retries: 1 }
    );
    assert_eq!(
        queue.record_failure(id).unwrap(),
        FailureOutcome::Retry { retries: 2 }
    );
    assert_eq!(queue.get(id).unwrap().status, RequestStatus::Failed);

    match queue.record_failure(id).unwrap() {
        FailureOutcome::Dead(dead) => assert_eq!(dead.retries, 2),
        other => panic!("expected dead letter, got {other:?}"),
    }
    assert_eq!(
        queue.record_failure(id).unwrap(),
        FailureOutcome::AlreadyHandled
    );
}
