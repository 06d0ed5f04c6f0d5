// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

fn sample_record() -> QueuedRequest {
    QueuedRequest {
        id: RequestId::new(1),
        url: "https://example.com/form".to_string(),
        method: Method::Post,
        headers: BTreeMap::new(),
        body: Some(json!({"name": "Ada"})),
        timestamp: 1_700_000_000_000,
        retries: 0,
        max_retries: 5,
        status: RequestStatus::Pending,
    }
}

#[parameterized(
    get_lower = { "get", Method::Get },
    post_mixed = { "PoSt", Method::Post },
    put_upper = { "PUT", Method::Put },
    delete = { "delete", Method::Delete },
    patch = { "patch", Method::Patch },
)]
fn method_parses_case_insensitively(input: &str, expected: Method) {
    assert_eq!(input.parse::<Method>().unwrap(), expected);
}

#[parameterized(
    unknown = { "FOO" },
    head = { "HEAD" },
    empty = { "" },
)]
fn method_rejects_other_verbs(input: &str) {
    let err = input.parse::<Method>().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn method_defaults_to_get() {
    assert_eq!(Method::default(), Method::Get);
}

#[parameterized(
    plain = { "12", 12 },
    hashed = { "#42", 42 },
)]
fn request_id_parses(input: &str, expected: i64) {
    assert_eq!(input.parse::<RequestId>().unwrap().get(), expected);
}

#[parameterized(
    zero = { "0" },
    negative = { "-3" },
    text = { "abc" },
)]
fn request_id_rejects_invalid(input: &str) {
    assert!(input.parse::<RequestId>().is_err());
}

#[test]
fn request_status_serializes_kebab_case() {
    let encoded = serde_json::to_string(&RequestStatus::InFlight).unwrap();
    assert_eq!(encoded, "\"in-flight\"");
}

#[test]
fn only_pending_and_failed_are_persistable() {
    assert!(RequestStatus::Pending.is_persistable());
    assert!(RequestStatus::Failed.is_persistable());
    assert!(!RequestStatus::InFlight.is_persistable());
    assert!(!RequestStatus::Dead.is_persistable());
}

#[test]
fn patch_from_json_drops_immutable_fields() {
    let patch = RequestPatch::from_json(&json!({
        "id": 99,
        "url": "http://other",
        "timestamp": 5,
        "retries": 1
    }))
    .unwrap();

    assert_eq!(patch, RequestPatch::retries(1));
}

#[test]
fn patch_from_json_rejects_non_object() {
    assert!(RequestPatch::from_json(&json!(null)).is_err());
    assert!(RequestPatch::from_json(&json!([1, 2])).is_err());
}

#[test]
fn patch_apply_merges_fields() {
    let mut record = sample_record();
    RequestPatch::retries(2)
        .with_status(RequestStatus::Failed)
        .apply(&mut record)
        .unwrap();

    assert_eq!(record.retries, 2);
    assert_eq!(record.status, RequestStatus::Failed);
    assert_eq!(record.url, "https://example.com/form");
}

#[test]
fn patch_apply_rejects_retries_above_cap() {
    let mut record = sample_record();
    let err = RequestPatch::retries(6).apply(&mut record).unwrap_err();
    assert!(err.to_string().contains("exceeds max_retries"));
    assert_eq!(record.retries, 0);
}

#[test]
fn patch_apply_rejects_runtime_only_status() {
    let mut record = sample_record();
    let patch = RequestPatch::default().with_status(RequestStatus::InFlight);
    assert!(patch.apply(&mut record).is_err());
    assert_eq!(record.status, RequestStatus::Pending);
}

#[test]
fn last_attempt_detection() {
    let mut record = sample_record();
    assert!(!record.is_last_attempt());
    record.retries = 5;
    assert!(record.is_last_attempt());
}
