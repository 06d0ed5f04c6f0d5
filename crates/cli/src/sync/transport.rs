// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for delivering queued requests.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP delivery for production
//! - Mock transports for unit testing

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use stow_core::{Method, QueuedRequest, ValidRequest};
use tracing::debug;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request could not be built (bad URL or header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// A request ready to go on the wire.
///
/// Borrowed from either a stored record or a freshly validated candidate, so
/// the same transport serves both the flush and the direct-submit paths.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub headers: &'a BTreeMap<String, String>,
    pub body: Option<&'a Value>,
}

impl<'a> From<&'a QueuedRequest> for OutgoingRequest<'a> {
    fn from(record: &'a QueuedRequest) -> Self {
        OutgoingRequest {
            method: record.method,
            url: &record.url,
            headers: &record.headers,
            body: record.body.as_ref(),
        }
    }
}

impl<'a> From<&'a ValidRequest> for OutgoingRequest<'a> {
    fn from(request: &'a ValidRequest) -> Self {
        OutgoingRequest {
            method: request.method(),
            url: request.url(),
            headers: request.headers(),
            body: request.body(),
        }
    }
}

/// Transport trait for request delivery.
///
/// This trait abstracts over the actual network client, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Send one request. Resolves to the 2xx status code on success.
    fn deliver<'a>(
        &'a self,
        request: OutgoingRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + 'a>>;

    /// Check whether `url` is reachable. Any HTTP response counts.
    fn probe<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + 'a>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(HttpTransport { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::ConnectionFailed(err.to_string())
    }
}

impl Transport for HttpTransport {
    fn deliver<'a>(
        &'a self,
        request: OutgoingRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(to_reqwest_method(request.method), request.url);
            for (name, value) in request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder = match request.body {
                // Strings are sent verbatim, anything else as JSON
                Some(Value::String(text)) => builder.body(text.clone()),
                Some(body) => builder.json(body),
                None => builder,
            };

            let response = builder.send().await.map_err(classify)?;
            let status = response.status();
            debug!(method = %request.method, url = request.url, %status, "delivery response");

            if status.is_success() {
                Ok(status.as_u16())
            } else {
                Err(TransportError::Status(status.as_u16()))
            }
        })
    }

    fn probe<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.client.head(url).send().await.map_err(classify)?;
            Ok(())
        })
    }
}
