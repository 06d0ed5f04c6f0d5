// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]

use super::test_helpers::MockTransport;
use super::transport::{HttpTransport, OutgoingRequest, Transport, TransportError};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use stow_core::{Method, QueuedRequest, RequestId, RequestStatus};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(method: Method, url: String, body: Option<Value>) -> QueuedRequest {
    QueuedRequest {
        id: RequestId::new(1),
        url,
        method,
        headers: BTreeMap::new(),
        body,
        timestamp: 0,
        retries: 0,
        max_retries: 5,
        status: RequestStatus::Pending,
    }
}

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_http_deliver_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let request = record(
        Method::Post,
        format!("{}/items", server.uri()),
        Some(json!({"name": "widget"})),
    );
    let status = transport()
        .deliver(OutgoingRequest::from(&request))
        .await
        .unwrap();
    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_http_deliver_sends_string_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(body_string("plain text"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = record(Method::Put, server.uri(), Some(json!("plain text")));
    let status = transport()
        .deliver(OutgoingRequest::from(&request))
        .await
        .unwrap();
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_http_deliver_sends_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-token", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = record(Method::Get, server.uri(), None);
    request
        .headers
        .insert("x-token".to_string(), "abc".to_string());
    transport()
        .deliver(OutgoingRequest::from(&request))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_http_non_success_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let request = record(Method::Delete, server.uri(), None);
    let err = transport()
        .deliver(OutgoingRequest::from(&request))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status(500)));
}

#[tokio::test]
async fn test_http_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_millis(100)).unwrap();
    let request = record(Method::Get, server.uri(), None);
    let err = transport
        .deliver(OutgoingRequest::from(&request))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout));
}

#[tokio::test]
async fn test_http_probe_accepts_any_response() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    transport()
        .probe(&format!("{}/health", server.uri()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_http_probe_unreachable() {
    // Nothing listens on port 1
    let err = transport().probe("http://127.0.0.1:1/").await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_mock_transport_records_and_fails() {
    let transport = MockTransport::new();
    let ok = record(Method::Get, "https://ok.example".to_string(), None);
    let bad = record(Method::Get, "https://bad.example".to_string(), None);
    transport.fail_url("https://bad.example");

    assert_eq!(
        transport.deliver(OutgoingRequest::from(&ok)).await.unwrap(),
        200
    );
    assert!(matches!(
        transport.deliver(OutgoingRequest::from(&bad)).await,
        Err(TransportError::Status(503))
    ));
    assert_eq!(transport.sent(), vec!["https://ok.example".to_string()]);
    assert_eq!(transport.attempts(), 2);

    transport.set_offline(true);
    assert!(transport.probe("https://ok.example").await.is_err());
}
